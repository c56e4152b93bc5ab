use std::collections::BTreeMap;

use serde::Serialize;
use sparrow::Project;
use url::Url;

use crate::error::Result;

pub const DEFINE_URL: &str = "https://codesandbox.io/api/v1/sandboxes/define";

#[derive(Serialize)]
struct SandboxFile<'a> {
    content: &'a str,
    #[serde(rename = "isBinary")]
    is_binary: bool,
}

#[derive(Serialize)]
struct Definition<'a> {
    files: BTreeMap<&'a str, SandboxFile<'a>>,
}

/// Compressed, URL-safe `parameters` value for a path → content map.
pub fn sandbox_parameters(files: &BTreeMap<String, String>) -> Result<String> {
    let definition = Definition {
        files: files
            .iter()
            .map(|(path, content)| {
                (
                    path.as_str(),
                    SandboxFile {
                        content,
                        is_binary: false,
                    },
                )
            })
            .collect(),
    };
    let json = serde_json::to_string(&definition)?;
    let compressed = lz_str::compress_to_base64(json.as_str());
    Ok(compressed
        .replace('+', "-")
        .replace('/', "_")
        .trim_end_matches('=')
        .to_string())
}

/// Extra query parameters for the embedded view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedOptions {
    pub view: Option<String>,
    pub run_on_click: Option<bool>,
}

impl EmbedOptions {
    /// Preview pane only, running immediately.
    pub fn preview() -> Self {
        Self {
            view: Some("preview".to_string()),
            run_on_click: Some(false),
        }
    }
}

pub fn embed_url(parameters: &str, options: &EmbedOptions) -> Result<String> {
    let mut query = vec![
        ("parameters", parameters.to_string()),
        ("embed", "1".to_string()),
    ];
    if let Some(view) = &options.view {
        query.push(("view", view.clone()));
    }
    if let Some(run) = options.run_on_click {
        query.push(("runonclick", u8::from(run).to_string()));
    }
    Ok(Url::parse_with_params(DEFINE_URL, &query)?.into())
}

pub fn anchor_url(parameters: &str) -> Result<String> {
    Ok(Url::parse_with_params(DEFINE_URL, &[("parameters", parameters)])?.into())
}

/// The non-embedded editor for an embed URL.
pub fn open_url(embed_url: &str) -> Result<String> {
    let mut url = Url::parse(embed_url)?;
    let query: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .map(|(key, value)| {
            if key == "embed" {
                (key, "0".to_string())
            } else {
                (key, value)
            }
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(query);
    Ok(url.into())
}

/// Preview URLs for one project snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub parameters: String,
    pub embed_url: String,
    pub anchor_url: String,
}

impl Preview {
    /// `None` when the project has no files to show.
    pub fn for_project(project: &Project) -> Result<Option<Self>> {
        Self::for_project_with(project, &EmbedOptions::preview())
    }

    pub fn for_project_with(project: &Project, options: &EmbedOptions) -> Result<Option<Self>> {
        let files = project.file_map();
        if files.is_empty() {
            tracing::debug!(project = %project.id, "no files to preview");
            return Ok(None);
        }
        let parameters = sandbox_parameters(&files)?;
        tracing::debug!(files = files.len(), chars = parameters.len(), "built sandbox parameters");
        Ok(Some(Self {
            embed_url: embed_url(&parameters, options)?,
            anchor_url: anchor_url(&parameters)?,
            parameters,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn files() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("package.json".to_string(), "{\"name\":\"demo\"}".to_string()),
            ("src/App.tsx".to_string(), "export default () => <p>hi/+?</p>;".to_string()),
        ])
    }

    fn decode(parameters: &str) -> serde_json::Value {
        let mut b64 = parameters.replace('-', "+").replace('_', "/");
        while b64.len() % 4 != 0 {
            b64.push('=');
        }
        let wide = lz_str::decompress_from_base64(b64.as_str()).unwrap();
        serde_json::from_str(&String::from_utf16(&wide).unwrap()).unwrap()
    }

    #[test]
    fn test_parameters_are_url_safe() {
        let params = sandbox_parameters(&files()).unwrap();
        assert!(!params.is_empty());
        assert!(
            params
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_parameters_carry_definition() {
        let value = decode(&sandbox_parameters(&files()).unwrap());
        assert_eq!(value["files"]["src/App.tsx"]["isBinary"], false);
        assert_eq!(
            value["files"]["package.json"]["content"],
            "{\"name\":\"demo\"}"
        );
    }

    #[test]
    fn test_embed_url() {
        let url = embed_url("abc", &EmbedOptions::preview()).unwrap();
        assert_eq!(
            url,
            "https://codesandbox.io/api/v1/sandboxes/define?parameters=abc&embed=1&view=preview&runonclick=0"
        );
        assert_eq!(
            embed_url("abc", &EmbedOptions::default()).unwrap(),
            "https://codesandbox.io/api/v1/sandboxes/define?parameters=abc&embed=1"
        );
    }

    #[test]
    fn test_embed_url_encodes_values() {
        let options = EmbedOptions {
            view: Some("split view".to_string()),
            run_on_click: None,
        };
        let url = embed_url("a-b_c", &options).unwrap();
        assert!(url.ends_with("?parameters=a-b_c&embed=1&view=split+view"));
    }

    #[test]
    fn test_anchor_and_open_urls() {
        assert_eq!(
            anchor_url("abc").unwrap(),
            "https://codesandbox.io/api/v1/sandboxes/define?parameters=abc"
        );
        let open = open_url(&embed_url("abc", &EmbedOptions::preview()).unwrap()).unwrap();
        assert_eq!(
            open,
            "https://codesandbox.io/api/v1/sandboxes/define?parameters=abc&embed=0&view=preview&runonclick=0"
        );
    }

    #[test]
    fn test_open_url_leaves_parameters_alone() {
        let open = open_url(&embed_url("xembed=1y", &EmbedOptions::default()).unwrap()).unwrap();
        let url = Url::parse(&open).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("parameters".to_string(), "xembed=1y".to_string()),
                ("embed".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_folders_excluded() {
        let project = Project::default_template(Utc::now());
        let preview = Preview::for_project(&project).unwrap().unwrap();
        let value = decode(&preview.parameters);
        let paths: Vec<&String> = value["files"].as_object().unwrap().keys().collect();
        assert_eq!(paths.len(), project.file_count());
        assert!(!paths.iter().any(|p| p.as_str() == "src"));
    }

    #[test]
    fn test_empty_project_has_no_preview() {
        let project = Project::empty("empty", Utc::now());
        assert!(Preview::for_project(&project).unwrap().is_none());
    }
}
