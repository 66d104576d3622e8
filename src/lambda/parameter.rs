use std::hash::{Hash, Hasher};

/// Lambda parameter. Identity is the `id`; the name is for messages only.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub id: u32,
    pub name: String,
}

impl Parameter {
    pub fn new(id: u32, name: &str) -> Self {
        Self { id, name: name.to_string() }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
