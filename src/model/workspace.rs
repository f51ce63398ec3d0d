#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub name: String,
    pub url: String,
    pub nested: bool,
    pub sub_views: Vec<View>,
}

impl View {
    pub fn new(name: &str, url: &str, nested: bool) -> View {
        View {
            name: name.to_string(),
            url: url.to_string(),
            nested: nested,
            sub_views: Vec::new(),
        }
    }

    pub fn has_nested_views(&self) -> bool {
        !self.sub_views.is_empty()
    }
}

/// Root of one Jenkins server: its views, starting with the primary one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub name: String,
    pub server_url: String,
    pub primary_view: Option<View>,
    pub views: Vec<View>,
}

impl Workspace {
    pub fn new(name: &str, server_url: &str) -> Workspace {
        Workspace {
            name: name.to_string(),
            server_url: server_url.to_string(),
            primary_view: None,
            views: Vec::new(),
        }
    }

    pub fn view_by_name(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|view| view.name == name)
    }

    /// Top-level views followed by their nested views, in server order.
    pub fn all_views(&self) -> Vec<&View> {
        let mut all = Vec::new();
        for view in &self.views {
            all.push(view);
            all.extend(view.sub_views.iter());
        }
        all
    }
}
