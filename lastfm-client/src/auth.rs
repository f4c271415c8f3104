#[derive(Debug, Clone)]
pub struct LastFmAuth {
    api_key: String,
}

impl LastFmAuth {
    pub fn new(api_key: impl Into<String>) -> LastFmAuth {
        LastFmAuth {
            api_key: api_key.into(),
        }
    }

    /// Appends the credential and response format. These always close the
    /// query string, after the method-specific parameters.
    pub fn add_to_query_pairs(
        &self,
        query_pairs: &mut url::form_urlencoded::Serializer<url::UrlQuery>,
    ) {
        query_pairs.append_pair("api_key", &self.api_key);
        query_pairs.append_pair("format", "json");
    }
}
