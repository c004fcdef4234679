use uuid::Uuid;

/// Catalog entries and records addressed by a stable id.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Label used in log lines and report headings.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Linear lookup over a catalog slice.
pub fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}
