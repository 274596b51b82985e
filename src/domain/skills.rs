// src/domain/skills.rs
//
// Regra de compatibilidade entre a especialidade do prestataire e o campo
// `skills_required` do Service. A política é configurável (SKILL_MATCH_POLICY).

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillMatchPolicy {
    /// `skills_required` contém a especialidade como substring (sensível a caixa).
    /// "Java" casa com "JavaScript".
    #[default]
    Substring,
    /// A especialidade precisa ser igual (sem caixa) a um dos itens
    /// separados por `,` `;` `/` ou `|`.
    Token,
}

impl FromStr for SkillMatchPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(SkillMatchPolicy::Substring),
            "token" => Ok(SkillMatchPolicy::Token),
            other => anyhow::bail!("política de skills desconhecida: {}", other),
        }
    }
}

impl SkillMatchPolicy {
    /// Sem requisito no Service, ou prestataire sem especialidade => compatível.
    pub fn matches(&self, skills_required: Option<&str>, specialty: Option<&str>) -> bool {
        let Some(required) = skills_required.filter(|s| !s.trim().is_empty()) else {
            return true;
        };
        let Some(specialty) = specialty.filter(|s| !s.trim().is_empty()) else {
            return true;
        };

        match self {
            SkillMatchPolicy::Substring => required.contains(specialty),
            SkillMatchPolicy::Token => required
                .split([',', ';', '/', '|'])
                .map(str::trim)
                .any(|token| token.eq_ignore_ascii_case(specialty.trim())),
        }
    }
}
