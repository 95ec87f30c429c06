//! Navigation targets emitted after submission

use url::form_urlencoded;

/// Detail page of a proposal; `new` asks the page to show the follow-up prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub proposal_id: String,
    pub new: bool,
}

impl Navigation {
    pub fn created(id: impl Into<String>) -> Self {
        Self {
            proposal_id: id.into(),
            new: true,
        }
    }

    /// Path of the target page
    pub fn location(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("id", &self.proposal_id);
        if self.new {
            query.append_pair("new", "true");
        }
        format!("/proposal/?{}", query.finish())
    }
}
