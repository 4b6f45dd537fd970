// src/keywords/synonyms.rs
use std::collections::HashMap;

/// Read-only lookup from a canonical skill name to its known spelling
/// variants. Injected into the matcher so deployments can extend it
/// without touching matching logic.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    variants: HashMap<String, Vec<String>>,
}

impl SynonymTable {
    pub fn new(variants: HashMap<String, Vec<String>>) -> Self {
        Self { variants }
    }

    /// Variants for a canonical skill, empty when none are known.
    pub fn variants_for(&self, skill: &str) -> &[String] {
        self.variants.get(skill).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        let entries: &[(&str, &[&str])] = &[
            ("react", &["reactjs", "react.js", "react native"]),
            ("node.js", &["nodejs", "node js"]),
            ("javascript", &["js", "ecmascript", "es6"]),
            ("typescript", &["ts"]),
            ("angular", &["angularjs"]),
            ("vue", &["vuejs", "vue.js"]),
            ("express", &["expressjs", "express.js"]),
            ("next.js", &["nextjs"]),
            ("postgresql", &["postgres"]),
            ("mongodb", &["mongo"]),
            ("kubernetes", &["k8s"]),
            ("aws", &["amazon web services"]),
            ("gcp", &["google cloud", "google cloud platform"]),
            ("azure", &["microsoft azure"]),
            (
                "ci/cd",
                &[
                    "continuous integration",
                    "continuous delivery",
                    "continuous deployment",
                ],
            ),
            ("machine learning", &["ml"]),
            ("rest api", &["restful", "rest apis", "restful api"]),
            ("microservices", &["micro services", "micro-services"]),
            ("c#", &["csharp", "c sharp"]),
            ("c++", &["cpp"]),
            ("power bi", &["powerbi"]),
            ("tailwind", &["tailwindcss", "tailwind css"]),
            ("data science", &["data scientist"]),
            ("teamwork", &["team work", "team player"]),
            ("problem solving", &["problem-solving"]),
            ("project management", &["project manager"]),
            ("leadership", &["team lead"]),
        ];

        let variants = entries
            .iter()
            .map(|(skill, vars)| {
                (
                    skill.to_string(),
                    vars.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect();

        Self { variants }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_skill_has_variants() {
        let table = SynonymTable::default();
        assert!(table
            .variants_for("react")
            .contains(&"reactjs".to_string()));
    }

    #[test]
    fn test_unknown_skill_has_no_variants() {
        let table = SynonymTable::default();
        assert!(table.variants_for("cobol").is_empty());
    }

    #[test]
    fn test_custom_table_is_injectable() {
        let mut map = HashMap::new();
        map.insert("rust".to_string(), vec!["rustlang".to_string()]);
        let table = SynonymTable::new(map);

        assert_eq!(table.variants_for("rust"), ["rustlang".to_string()]);
        assert!(table.variants_for("react").is_empty());
    }
}
