use std::time::Duration;

use pantry_core::client::PantryClient;
use pantry_core::models::{CoreError, CoreErrorKind, EntityId, ListQuery, Pagination};
use serde::Serialize;
use serde_json::{Value, json};

pub const USAGE: &str = "usage: pantry <command>

commands:
  recipes [page]              list recipes
  recipe <id>                 show one recipe
  saved                       list saved recipes
  like <id>                   toggle like on a listed recipe
  save <id>                   toggle save on a listed recipe
  delete <id>                 delete a recipe
  import <url>                import a recipe from a social post
  collections                 list collections
  collect <collection> <id>   add a recipe to a collection
  categories                  list categories
  tags                        list tags
  notifications               list notifications
  read <id>                   mark one notification read
  read-all                    mark every notification read
  unread                      show the unread notification count
  watch [seconds]             poll the unread count until interrupted
  login <email> <password>    sign in and persist the session
  logout                      forget the persisted session
  whoami                      show the signed-in user";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Recipes { page: u64 },
    Recipe { id: EntityId },
    Saved,
    Like { id: EntityId },
    Save { id: EntityId },
    Delete { id: EntityId },
    Import { url: String },
    Collections,
    Collect { collection: EntityId, recipe: EntityId },
    Categories,
    Tags,
    Notifications,
    Read { id: EntityId },
    ReadAll,
    Unread,
    Watch { seconds: Option<u64> },
    Login { email: String, password: String },
    Logout,
    WhoAmI,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let Some((name, rest)) = args.split_first() else {
            return Err("missing command".to_string());
        };
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

        let command = match (name.as_str(), rest.as_slice()) {
            ("recipes", []) => Self::Recipes { page: 1 },
            ("recipes", [page]) => Self::Recipes {
                page: parse_number(page, "page")?,
            },
            ("recipe", [id]) => Self::Recipe { id: parse_id(id)? },
            ("saved", []) => Self::Saved,
            ("like", [id]) => Self::Like { id: parse_id(id)? },
            ("save", [id]) => Self::Save { id: parse_id(id)? },
            ("delete", [id]) => Self::Delete { id: parse_id(id)? },
            ("import", [url]) => Self::Import {
                url: (*url).to_string(),
            },
            ("collections", []) => Self::Collections,
            ("collect", [collection, recipe]) => Self::Collect {
                collection: parse_id(collection)?,
                recipe: parse_id(recipe)?,
            },
            ("categories", []) => Self::Categories,
            ("tags", []) => Self::Tags,
            ("notifications", []) => Self::Notifications,
            ("read", [id]) => Self::Read { id: parse_id(id)? },
            ("read-all", []) => Self::ReadAll,
            ("unread", []) => Self::Unread,
            ("watch", []) => Self::Watch { seconds: None },
            ("watch", [seconds]) => Self::Watch {
                seconds: Some(parse_number(seconds, "seconds")?),
            },
            ("login", [email, password]) => Self::Login {
                email: (*email).to_string(),
                password: (*password).to_string(),
            },
            ("logout", []) => Self::Logout,
            ("whoami", []) => Self::WhoAmI,
            (other, _) => return Err(format!("unknown command or arguments: '{other}'")),
        };
        Ok(command)
    }
}

pub async fn run(client: &PantryClient, command: Command) -> Result<String, CoreError> {
    client.auth.restore().await?;

    let output = match command {
        Command::Recipes { page } => {
            let page = client.recipes.fetch_list(ListQuery::page(page)).await?;
            list_output(&page.items, page.pagination)
        }
        Command::Recipe { id } => to_json(&client.recipes.fetch_one(id).await?)?,
        Command::Saved => {
            let page = client.recipes.fetch_saved(ListQuery::default()).await?;
            list_output(&page.items, page.pagination)
        }
        Command::Like { id } => {
            load_recipe(client, id).await?;
            json!({ "id": id, "liked": client.recipes.toggle_like(id).await? })
        }
        Command::Save { id } => {
            load_recipe(client, id).await?;
            json!({ "id": id, "saved": client.recipes.toggle_save(id).await? })
        }
        Command::Delete { id } => {
            client.recipes.remove(id).await?;
            json!({ "id": id, "deleted": true })
        }
        Command::Import { url } => to_json(&client.recipes.import_from_social(&url).await?)?,
        Command::Collections => {
            let page = client.collections.fetch_list(ListQuery::default()).await?;
            list_output(&page.items, page.pagination)
        }
        Command::Collect { collection, recipe } => {
            let updated = client.collections.add_recipe(collection, recipe).await?;
            to_json(&updated)?
        }
        Command::Categories => {
            let page = client.categories.fetch_list(ListQuery::default()).await?;
            list_output(&page.items, page.pagination)
        }
        Command::Tags => {
            let page = client.tags.fetch_list(ListQuery::default()).await?;
            list_output(&page.items, page.pagination)
        }
        Command::Notifications => {
            let page = client
                .notifications
                .fetch_list(ListQuery::default())
                .await?;
            list_output(&page.items, page.pagination)
        }
        Command::Read { id } => {
            client.notifications.mark_read(id).await?;
            json!({ "id": id, "read": true })
        }
        Command::ReadAll => {
            client.notifications.mark_all_read().await?;
            json!({ "unread": 0 })
        }
        Command::Unread => json!({ "unread": client.notifications.refresh_unread_count().await? }),
        Command::Watch { seconds } => return watch(client, seconds).await,
        Command::Login { email, password } => {
            let session = client.auth.login(&email, &password).await?;
            to_json(&session.user)?
        }
        Command::Logout => {
            client.auth.logout().await?;
            json!({ "signedOut": true })
        }
        Command::WhoAmI => match client.auth.current_user().await {
            Some(user) => to_json(&user)?,
            None => Value::Null,
        },
    };

    render(&output)
}

/// Prints the unread count each time it changes. Runs until interrupted,
/// or for `seconds` when given.
async fn watch(client: &PantryClient, seconds: Option<u64>) -> Result<String, CoreError> {
    let mut unread = client.notifications.subscribe_unread();
    let mut poller = client.unread_poller();
    poller.start();

    let report = async {
        while unread.changed().await.is_ok() {
            let count = *unread.borrow_and_update();
            println!("{}", json!({ "unread": count }));
        }
    };

    match seconds {
        Some(seconds) => {
            let _ = tokio::time::timeout(Duration::from_secs(seconds), report).await;
        }
        None => report.await,
    }

    poller.stop();
    render(&json!({ "unread": client.notifications.unread_count() }))
}

async fn load_recipe(client: &PantryClient, id: EntityId) -> Result<(), CoreError> {
    if client.recipes.snapshot().holds(id) {
        return Ok(());
    }
    client.recipes.fetch_one(id).await.map(|_| ())
}

fn list_output<T: Serialize>(items: &[T], pagination: Option<Pagination>) -> Value {
    json!({ "items": items, "pagination": pagination })
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, CoreError> {
    serde_json::to_value(value).map_err(|error| {
        CoreError::new(
            CoreErrorKind::Internal,
            format!("failed to encode output: {error}"),
        )
    })
}

fn render(value: &Value) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value).map_err(|error| {
        CoreError::new(
            CoreErrorKind::Internal,
            format!("failed to render output: {error}"),
        )
    })
}

fn parse_id(raw: &str) -> Result<EntityId, String> {
    parse_number::<i64>(raw, "id").map(EntityId)
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("invalid {name} '{raw}': expected a number"))
}
