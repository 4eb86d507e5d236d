//! The static source list. Read-only at runtime; the dispatcher fans it out
//! at the start of every run.

use std::path::Path;

use nr_core::{Result, Source};

fn source(id: &str, name: &str, url: &str) -> Source {
    Source {
        id: id.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        is_active: None,
        exclude_categories: Vec::new(),
    }
}

/// The built-in Hungarian news feeds.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source {
            exclude_categories: vec!["English".to_string()],
            ..source("telex-hu", "Telex", "https://telex.hu/rss")
        },
        source("24-hu", "24.hu", "https://24.hu/feed/"),
        source("444-hu", "444", "https://444.hu/feed"),
        source("index-hu", "Index", "https://index.hu/24ora/rss/"),
        source("hvg-hu", "HVG", "https://hvg.hu/rss"),
        source(
            "portfolio-hu",
            "Portfolio",
            "https://www.portfolio.hu/rss/all.xml",
        ),
        source(
            "origo-hu",
            "Origo",
            "https://www.origo.hu/publicapi/hu/rss/origo/articles",
        ),
        source(
            "magyarnemzet-hu",
            "Magyarnemzet",
            "https://magyarnemzet.hu/publicapi/hu/rss/magyar_nemzet/articles",
        ),
        source("tenyek-hu", "Tények", "https://tenyek.hu/publicapi/hu/rss"),
        source(
            "mandiner-hu",
            "Mandiner",
            "https://mandiner.hu/publicapi/hu/rss/mandiner/articles",
        ),
    ]
}

/// Loads a source list from a JSON file (an array of `Source` objects).
pub async fn load_sources(path: &Path) -> Result<Vec<Source>> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_has_unique_ids() {
        let sources = default_sources();
        let mut ids: Vec<_> = sources.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), sources.len());
    }

    #[test]
    fn telex_excludes_english() {
        let sources = default_sources();
        let telex = sources.iter().find(|s| s.id == "telex-hu").unwrap();
        assert_eq!(telex.exclude_categories, vec!["English"]);
        assert!(telex.is_active());
    }

    #[tokio::test]
    async fn loads_sources_from_json() {
        let dir = std::env::temp_dir().join("nr_sources_test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("sources.json");
        tokio::fs::write(
            &path,
            r#"[{"id":"s1","name":"One","url":"https://x/feed","isActive":false}]"#,
        )
        .await
        .unwrap();

        let sources = load_sources(&path).await.unwrap();
        assert_eq!(sources.len(), 1);
        assert!(!sources[0].is_active());
        assert!(sources[0].exclude_categories.is_empty());
    }
}
