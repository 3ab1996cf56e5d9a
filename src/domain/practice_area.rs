//! Compiled-in catalog of the firm's practice areas.

use serde::Serialize;

use crate::domain::types::Locale;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PracticeArea {
    pub slug: &'static str,
    pub title_pt: &'static str,
    pub title_en: &'static str,
    pub summary_pt: &'static str,
    pub summary_en: &'static str,
}

impl PracticeArea {
    pub fn title(&self, locale: Locale) -> &'static str {
        locale.pick(self.title_pt, self.title_en)
    }

    pub fn summary(&self, locale: Locale) -> &'static str {
        locale.pick(self.summary_pt, self.summary_en)
    }
}

pub const PRACTICE_AREAS: &[PracticeArea] = &[
    PracticeArea {
        slug: "civil",
        title_pt: "Direito Civil",
        title_en: "Civil Law",
        summary_pt: "Contratos, responsabilidade civil, família e sucessões.",
        summary_en: "Contracts, civil liability, family and estates.",
    },
    PracticeArea {
        slug: "trabalhista",
        title_pt: "Direito do Trabalho",
        title_en: "Labor Law",
        summary_pt: "Assessoria a empregadores e empregados, reclamações e acordos.",
        summary_en: "Advice to employers and employees, claims and settlements.",
    },
    PracticeArea {
        slug: "empresarial",
        title_pt: "Direito Empresarial",
        title_en: "Corporate Law",
        summary_pt: "Societário, recuperação judicial e contratos empresariais.",
        summary_en: "Corporate matters, judicial reorganization and commercial contracts.",
    },
    PracticeArea {
        slug: "tributario",
        title_pt: "Direito Tributário",
        title_en: "Tax Law",
        summary_pt: "Planejamento tributário e contencioso administrativo e judicial.",
        summary_en: "Tax planning and administrative and judicial litigation.",
    },
    PracticeArea {
        slug: "imobiliario",
        title_pt: "Direito Imobiliário",
        title_en: "Real Estate Law",
        summary_pt: "Leilões judiciais, regularização e due diligence de imóveis.",
        summary_en: "Judicial auctions, title regularization and property due diligence.",
    },
];

/// Finds a practice area by its URL slug.
pub fn find_practice_area(slug: &str) -> Option<&'static PracticeArea> {
    PRACTICE_AREAS.iter().find(|area| area.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_unique() {
        for (i, a) in PRACTICE_AREAS.iter().enumerate() {
            assert!(PRACTICE_AREAS[i + 1..].iter().all(|b| b.slug != a.slug));
        }
    }

    #[test]
    fn finds_by_slug() {
        assert_eq!(find_practice_area("civil").map(|a| a.title_en), Some("Civil Law"));
        assert!(find_practice_area("maritimo").is_none());
    }
}
