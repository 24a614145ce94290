//! List the documents of a content module

use anyhow::Result;
use serde_json::Value;

use crate::Folio;

/// One line per document of `module`, from its `getAll` query
pub fn entries(folio: &Folio, module: &str) -> Result<Vec<String>> {
    let path = format!("{}:getAll", module);
    if folio.registry.kind_of(&path).is_none() {
        let modules: Vec<&str> = folio
            .registry
            .functions()
            .filter_map(|(p, _)| p.strip_suffix(":getAll"))
            .collect();
        anyhow::bail!(
            "Unknown module: {}. Available: {}",
            module,
            modules.join(", ")
        );
    }

    let docs = folio.query(&path, Value::Null)?;
    let docs = docs.as_array().cloned().unwrap_or_default();
    Ok(docs.iter().map(describe).collect())
}

fn describe(doc: &Value) -> String {
    let title = doc["title"].as_str().unwrap_or("(untitled)");
    match doc["_id"].as_str() {
        Some(id) => format!("{} [{}]", title, id),
        None => title.to_string(),
    }
}

/// Print the documents of `module`
pub fn run(folio: &Folio, module: &str) -> Result<()> {
    let entries = entries(folio, module)?;
    println!("{} ({}):", module, entries.len());
    for entry in entries {
        println!("  {}", entry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_list_static_module() {
        let folio = Folio::in_memory(SiteConfig::default());
        let entries = entries(&folio, "testingData").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], "Terminal Portfolio");
    }

    #[test]
    fn test_list_unknown_module() {
        let folio = Folio::in_memory(SiteConfig::default());
        let err = entries(&folio, "pageContent").unwrap_err();
        assert!(err.to_string().contains("Available"));
    }
}
