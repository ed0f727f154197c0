//! Manifest describing the layer hierarchy inside a `.lzip` archive

use serde::{Deserialize, Serialize};

/// One node of the exported hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ManifestEntry {
    /// A layer group; `name` is the group's name as shown in the editor
    Group {
        name: String,
        layers: Vec<ManifestEntry>,
    },
    /// A rendered layer stored at `path` inside the archive
    Layer { path: String },
}

impl ManifestEntry {
    pub fn group(name: impl Into<String>, layers: Vec<ManifestEntry>) -> Self {
        ManifestEntry::Group {
            name: name.into(),
            layers,
        }
    }

    pub fn layer(path: impl Into<String>) -> Self {
        ManifestEntry::Layer { path: path.into() }
    }

    /// Archive paths of every layer under this entry, depth-first
    pub fn layer_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            ManifestEntry::Group { layers, .. } => {
                for entry in layers {
                    entry.collect_paths(out);
                }
            }
            ManifestEntry::Layer { path } => out.push(path),
        }
    }
}

/// Root document stored as the archive's manifest member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub width: u32,
    pub height: u32,
    pub layers: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn layer_paths(&self) -> Vec<&str> {
        self.layers.iter().flat_map(|e| e.layer_paths()).collect()
    }

    /// Indented JSON
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_shape() {
        let manifest = Manifest {
            width: 640,
            height: 480,
            layers: vec![
                ManifestEntry::layer("Background.png"),
                ManifestEntry::group("Line Art", vec![ManifestEntry::layer("Line_Art/Ink.png")]),
            ],
        };

        let json = String::from_utf8(manifest.to_json().unwrap()).unwrap();
        assert!(json.contains("\n  \"width\": 640"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["height"], 480);
        assert_eq!(value["layers"][0]["type"], "layer");
        assert_eq!(value["layers"][0]["path"], "Background.png");
        assert_eq!(value["layers"][1]["type"], "group");
        assert_eq!(value["layers"][1]["name"], "Line Art");
        assert_eq!(value["layers"][1]["layers"][0]["path"], "Line_Art/Ink.png");

        assert_eq!(Manifest::from_json(json.as_bytes()).unwrap(), manifest);
    }

    #[test]
    fn test_layer_paths_depth_first() {
        let manifest = Manifest {
            width: 1,
            height: 1,
            layers: vec![
                ManifestEntry::group(
                    "A",
                    vec![
                        ManifestEntry::layer("A/1.png"),
                        ManifestEntry::group("B", vec![ManifestEntry::layer("A/B/2.png")]),
                    ],
                ),
                ManifestEntry::group("Empty", vec![]),
                ManifestEntry::layer("3.png"),
            ],
        };
        assert_eq!(manifest.layer_paths(), vec!["A/1.png", "A/B/2.png", "3.png"]);
    }
}
