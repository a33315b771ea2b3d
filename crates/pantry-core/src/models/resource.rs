use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Recipe,
    Collection,
    Notification,
    Category,
    Tag,
    Session,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recipe => "recipe",
            Self::Collection => "collection",
            Self::Notification => "notification",
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Session => "session",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StoreAction {
    FetchList,
    FetchSaved,
    FetchOne,
    Create,
    Update,
    Remove,
    Like,
    Unlike,
    Save,
    Unsave,
    MarkRead,
    MarkAllRead,
    UnreadCount,
    Import,
    AddToCollection,
    RemoveFromCollection,
    Login,
    Register,
    Logout,
    RestoreSession,
}

impl StoreAction {
    /// Toast text for actions that announce success.
    pub fn success_message(self, resource: ResourceKind) -> Option<String> {
        let verb = match self {
            Self::Create => "created",
            Self::Update => "updated",
            Self::Remove => "deleted",
            Self::Import => "imported",
            Self::AddToCollection => "added to collection",
            Self::RemoveFromCollection => "removed from collection",
            _ => return None,
        };
        let noun = match self {
            Self::AddToCollection | Self::RemoveFromCollection => "Recipe".to_string(),
            _ => capitalize(resource.as_str()),
        };
        Some(format!("{noun} {verb}"))
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
