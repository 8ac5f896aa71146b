use crate::protocol::BrowsingContext;

/// What a browsing context may do with site preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteAccess {
    host: Option<String>,
    private: bool,
}

impl SiteAccess {
    pub fn for_context(context: &BrowsingContext) -> Self {
        let host = if context.is_http() {
            context.host().filter(|h| !h.is_empty()).map(str::to_string)
        } else {
            None
        };
        Self {
            host,
            private: context.private,
        }
    }

    /// Host whose preferences may be read (http(s) origins only).
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Host whose preferences may be written. Never in private browsing.
    pub fn persist_host(&self) -> Option<&str> {
        if self.private {
            None
        } else {
            self.host()
        }
    }

    pub fn can_persist(&self) -> bool {
        self.persist_host().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn access(uri: &str, private: bool) -> SiteAccess {
        SiteAccess::for_context(&BrowsingContext::new(Url::parse(uri).unwrap(), private))
    }

    #[test]
    fn http_origins_read_and_write() {
        let a = access("http://forum.example:8080/post", false);
        assert_eq!(a.host(), Some("forum.example"));
        assert!(a.can_persist());
    }

    #[test]
    fn private_http_reads_but_never_writes() {
        let a = access("https://forum.example/", true);
        assert_eq!(a.host(), Some("forum.example"));
        assert_eq!(a.persist_host(), None);
        assert!(!a.can_persist());
    }

    #[test]
    fn other_schemes_have_no_site() {
        for uri in ["file:///tmp/form.html", "data:text/html,hi", "about:blank"] {
            let a = access(uri, false);
            assert_eq!(a.host(), None, "{uri}");
            assert!(!a.can_persist());
        }
    }
}
