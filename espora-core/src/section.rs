//! Fixed catalog of checklist sections.
//!
//! The order of [`SECTION_ORDER`] is the display and sort priority of the
//! checklist. Section ids outside the table sort after every known section
//! and are titled with their raw id.

use crate::SectionId;

/// A known checklist section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
}

pub const SECTION_ORDER: [Section; 7] = [
    Section {
        id: "estrategia",
        title: "Set Up Estrategia Digital",
    },
    Section {
        id: "contenido",
        title: "Set Up Contenido",
    },
    Section {
        id: "diseno",
        title: "Set Up Diseño",
    },
    Section {
        id: "campanas",
        title: "Set Up Campañas",
    },
    Section {
        id: "difusion",
        title: "Set Up Difusión",
    },
    Section {
        id: "reporteo",
        title: "Set Up Reporteo",
    },
    Section {
        id: "facturacion",
        title: "Set Up Facturación",
    },
];

impl Section {
    /// Look up a known section by id.
    pub fn find(section_id: &str) -> Option<&'static Section> {
        SECTION_ORDER.iter().find(|s| s.id == section_id)
    }

    /// Sort rank of a section id; unknown ids rank after all known ones.
    pub fn rank(section_id: &str) -> usize {
        SECTION_ORDER
            .iter()
            .position(|s| s.id == section_id)
            .unwrap_or(SECTION_ORDER.len())
    }

    /// Display title for a section id.
    pub fn title_for(section_id: &SectionId) -> String {
        Self::find(section_id.as_str())
            .map(|s| s.title.to_string())
            .unwrap_or_else(|| section_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estrategia_ranks_before_difusion() {
        assert!(Section::rank("estrategia") < Section::rank("difusion"));
    }

    #[test]
    fn test_unknown_section_ranks_last_with_raw_title() {
        assert_eq!(Section::rank("misc"), SECTION_ORDER.len());
        assert_eq!(Section::title_for(&SectionId::from("misc")), "misc");
        assert_eq!(
            Section::title_for(&SectionId::from("estrategia")),
            "Set Up Estrategia Digital"
        );
    }

    #[test]
    fn test_section_ids_are_unique() {
        for (i, a) in SECTION_ORDER.iter().enumerate() {
            for b in SECTION_ORDER.iter().skip(i + 1) {
                assert_ne!(a.id, b.id);
            }
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_unknown_ids_rank_after_known(id in "[a-z]{1,12}") {
            proptest::prop_assume!(Section::find(&id).is_none());
            for known in SECTION_ORDER.iter() {
                proptest::prop_assert!(Section::rank(known.id) < Section::rank(&id));
            }
            proptest::prop_assert_eq!(Section::title_for(&SectionId::from(id.as_str())), id);
        }
    }
}
