use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// A category label and the substrings that trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct CategoryRule {
    pub(crate) label: String,
    pub(crate) keywords: Vec<String>,
}

impl CategoryRule {
    pub(crate) fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// The closed set of categories a quick entry can land in.
///
/// `expense` is ordered: the classifier walks it top to bottom and the
/// first category with a matching keyword wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Taxonomy {
    pub(crate) income: CategoryRule,
    #[serde(default)]
    pub(crate) expense: Vec<CategoryRule>,
    #[serde(default = "default_fallback_category")]
    pub(crate) fallback_category: String,
    #[serde(default = "default_fallback_description")]
    pub(crate) fallback_description: String,
}

fn default_fallback_category() -> String {
    "Other".to_string()
}

fn default_fallback_description() -> String {
    "General expense".to_string()
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            income: CategoryRule::new(
                "Salário",
                &[
                    "salário",
                    "salario",
                    "freela",
                    "renda",
                    "recebi",
                    "reembolso",
                    "dividendo",
                    "pix recebido",
                ],
            ),
            expense: vec![
                CategoryRule::new(
                    "Alimentação",
                    &[
                        "pastel",
                        "almoço",
                        "almoco",
                        "jantar",
                        "lanche",
                        "café",
                        "cafe",
                        "restaurante",
                        "mercado",
                        "padaria",
                        "ifood",
                        "pizza",
                        "açaí",
                        "feira",
                    ],
                ),
                CategoryRule::new(
                    "Transporte",
                    &[
                        "uber",
                        "99pop",
                        "táxi",
                        "taxi",
                        "ônibus",
                        "onibus",
                        "metrô",
                        "metro",
                        "gasolina",
                        "combustível",
                        "combustivel",
                        "estacionamento",
                        "pedágio",
                    ],
                ),
                CategoryRule::new(
                    "Moradia",
                    &[
                        "aluguel",
                        "condomínio",
                        "condominio",
                        "luz",
                        "energia",
                        "água",
                        "agua",
                        "internet",
                        "gás",
                        "iptu",
                    ],
                ),
                CategoryRule::new(
                    "Lazer",
                    &[
                        "cinema", "netflix", "spotify", "show", "teatro", "viagem", "festa",
                        "cerveja", "jogo",
                    ],
                ),
                CategoryRule::new(
                    "Saúde",
                    &[
                        "farmácia",
                        "farmacia",
                        "remédio",
                        "remedio",
                        "médico",
                        "medico",
                        "consulta",
                        "dentista",
                        "hospital",
                        "exame",
                    ],
                ),
                CategoryRule::new(
                    "Educação",
                    &[
                        "escola",
                        "curso",
                        "faculdade",
                        "livro",
                        "mensalidade",
                        "material escolar",
                    ],
                ),
            ],
            fallback_category: default_fallback_category(),
            fallback_description: default_fallback_description(),
        }
    }
}

impl Taxonomy {
    /// Load `path` if it exists, otherwise use the built-in taxonomy.
    pub(crate) fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy: {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid taxonomy file: {}", path.display()))
    }

    pub(crate) fn from_toml_str(raw: &str) -> Result<Self> {
        let taxonomy: Self = toml::from_str(raw).context("Failed to parse taxonomy TOML")?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.fallback_category.trim().is_empty() {
            anyhow::bail!("fallback_category must not be empty");
        }
        if self.fallback_description.trim().is_empty() {
            anyhow::bail!("fallback_description must not be empty");
        }

        let mut seen = HashSet::new();
        for rule in std::iter::once(&self.income).chain(&self.expense) {
            if rule.label.trim().is_empty() {
                anyhow::bail!("category labels must not be empty");
            }
            if !seen.insert(rule.label.to_lowercase()) {
                anyhow::bail!("duplicate category label: {}", rule.label);
            }
            // An empty keyword would match every description.
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                anyhow::bail!("category '{}' has an empty keyword", rule.label);
            }
        }
        Ok(())
    }

    /// Every label a parsed entry can carry: income, expenses, fallback.
    pub(crate) fn labels(&self) -> Vec<&str> {
        let mut labels = vec![self.income.label.as_str()];
        labels.extend(self.expense.iter().map(|r| r.label.as_str()));
        if !labels.contains(&self.fallback_category.as_str()) {
            labels.push(self.fallback_category.as_str());
        }
        labels
    }

    /// Canonical spelling of `name` if it is one of [`Taxonomy::labels`].
    pub(crate) fn find_label(&self, name: &str) -> Option<&str> {
        let lower = name.trim().to_lowercase();
        self.labels()
            .into_iter()
            .find(|label| label.to_lowercase() == lower)
    }
}
