use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Binding of a requested model name to one provider's native identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub canonical_name: String,
    pub provider: String,
    pub provider_model_id: String,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl CatalogEntry {
    pub fn new(
        canonical_name: impl Into<String>,
        provider: impl Into<String>,
        provider_model_id: impl Into<String>,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            provider: provider.into(),
            provider_model_id: provider_model_id.into(),
            meta: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

/// Outcome of one query executed against one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub provider: String,
    pub model_id: String,
    pub canonical_name: String,
    pub query: String,
    pub ok: bool,
    /// Seconds spent in the inference call
    pub response_time: Option<f64>,
    pub response_preview: Option<String>,
    pub error: Option<String>,
}

impl RunRecord {
    pub fn success(entry: &CatalogEntry, query: &str, seconds: f64, preview: String) -> Self {
        Self {
            ok: true,
            response_time: Some(seconds),
            response_preview: Some(preview),
            ..Self::blank(entry, query)
        }
    }

    pub fn failure(entry: &CatalogEntry, query: &str, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::blank(entry, query)
        }
    }

    fn blank(entry: &CatalogEntry, query: &str) -> Self {
        Self {
            provider: entry.provider.clone(),
            model_id: entry.provider_model_id.clone(),
            canonical_name: entry.canonical_name.clone(),
            query: query.to_string(),
            ok: false,
            response_time: None,
            response_preview: None,
            error: None,
        }
    }
}

/// Models visible to each provider at discovery time, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    providers: Vec<(String, Vec<String>)>,
}

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the listing for a provider, replacing any earlier one.
    pub fn insert(&mut self, provider: impl Into<String>, models: Vec<String>) {
        let provider = provider.into();
        match self.providers.iter_mut().find(|(id, _)| *id == provider) {
            Some((_, existing)) => *existing = models,
            None => self.providers.push((provider, models)),
        }
    }

    pub fn get(&self, provider: &str) -> Option<&[String]> {
        self.providers
            .iter()
            .find(|(id, _)| id == provider)
            .map(|(_, models)| models.as_slice())
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.get(provider).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.providers
            .iter()
            .map(|(id, models)| (id.as_str(), models.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn total_models(&self) -> usize {
        self.providers.iter().map(|(_, models)| models.len()).sum()
    }
}

impl FromIterator<(String, Vec<String>)> for Availability {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut availability = Self::new();
        for (provider, models) in iter {
            availability.insert(provider, models);
        }
        availability
    }
}
