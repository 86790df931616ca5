//! Pure progress computations over a learning path and its recorded state.
//!
//! Every function here is synchronous, side-effect free, and total: unknown
//! modules or sections degrade to 0% / not-locked defaults instead of
//! raising. Callers that care about the distinction resolve ids against the
//! catalog first.

use crate::model::{LearningPath, ModuleId, PathProgress, Section, SectionId, SectionProgress, SectionRef};

/// Percent of `count` out of `total`, rounded half-up. Returns 0 when
/// `total` is 0.
///
/// # Examples
///
/// ```
/// # use academy_core::engine::rounded_percent;
/// assert_eq!(rounded_percent(1, 3), 33);
/// assert_eq!(rounded_percent(2, 3), 67);
/// assert_eq!(rounded_percent(3, 3), 100);
/// ```
#[must_use]
pub fn rounded_percent(count: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (200 * u64::from(count) + u64::from(total)) / (2 * u64::from(total));
    u8::try_from(scaled).unwrap_or(100)
}

// Average of already-scaled percents, same rounding.
fn rounded_average(sum: u32, count: u32) -> u8 {
    if count == 0 {
        return 0;
    }
    let scaled = (2 * u64::from(sum) + u64::from(count)) / (2 * u64::from(count));
    u8::try_from(scaled).unwrap_or(100)
}

// Percent of one section against its catalog definition. The catalog's
// checkbox count wins over whatever length was persisted.
fn percent_for(section: &Section, recorded: Option<&SectionProgress>) -> u8 {
    let Some(recorded) = recorded else { return 0 };

    if section.checkbox_count() == 0 {
        return if recorded.completed_at().is_some() { 100 } else { 0 };
    }

    let limit = section.checkbox_count() as usize;
    let checked = recorded
        .checkbox_states()
        .iter()
        .take(limit)
        .filter(|state| **state)
        .count();
    rounded_percent(
        u32::try_from(checked).unwrap_or(u32::MAX),
        section.checkbox_count(),
    )
}

/// Current percent of a section; 0 for unstarted or unknown sections.
#[must_use]
pub fn section_percent(
    path: &LearningPath,
    progress: &PathProgress,
    module: &ModuleId,
    section: &SectionId,
) -> u8 {
    let Some(definition) = path.section(module, section) else {
        return 0;
    };
    percent_for(definition, progress.section(module, section))
}

/// Average percent across every catalog section of the module, unstarted
/// sections counting as 0. Unknown modules report 0.
#[must_use]
pub fn module_percent(path: &LearningPath, progress: &PathProgress, module: &ModuleId) -> u8 {
    let Some(definition) = path.module(module) else {
        return 0;
    };
    let sum: u32 = definition
        .sections()
        .iter()
        .map(|s| u32::from(percent_for(s, progress.section(module, s.id()))))
        .sum();
    rounded_average(sum, u32::try_from(definition.sections().len()).unwrap_or(u32::MAX))
}

/// Average percent across the whole path's flattened section sequence.
#[must_use]
pub fn path_percent(path: &LearningPath, progress: &PathProgress) -> u8 {
    let mut sum = 0_u32;
    let mut count = 0_u32;
    for (module, section) in path.section_refs() {
        sum += u32::from(percent_for(section, progress.section(module.id(), section.id())));
        count += 1;
    }
    rounded_average(sum, count)
}

/// True when every catalog section of the module is at 100%.
#[must_use]
pub fn module_is_complete(path: &LearningPath, progress: &PathProgress, module: &ModuleId) -> bool {
    let Some(definition) = path.module(module) else {
        return false;
    };
    definition
        .sections()
        .iter()
        .all(|s| percent_for(s, progress.section(module, s.id())) == 100)
}

/// Lock decision for a section.
///
/// The first section of the path is never locked. Every other section is
/// locked exactly while its immediate predecessor in the flattened path
/// sequence sits below 100%, so the first section of one module is gated by
/// the last section of the module before it. Sections missing from the
/// catalog are never locked.
#[must_use]
pub fn is_section_locked(
    path: &LearningPath,
    progress: &PathProgress,
    module: &ModuleId,
    section: &SectionId,
) -> bool {
    let Some(ordinal) = path.ordinal(module, section) else {
        return false;
    };
    if ordinal == 0 {
        return false;
    }
    let Some((prev_module, prev_section)) = path.section_at(ordinal - 1) else {
        return false;
    };
    percent_for(
        prev_section,
        progress.section(prev_module.id(), prev_section.id()),
    ) < 100
}

/// First section in flattened order that sits below 100%, or `None` when the
/// path is fully complete. By the lock chain, the returned section is always
/// unlocked.
#[must_use]
pub fn next_incomplete_section(path: &LearningPath, progress: &PathProgress) -> Option<SectionRef> {
    path.section_refs()
        .find(|(module, section)| {
            percent_for(section, progress.section(module.id(), section.id())) < 100
        })
        .map(|(module, section)| SectionRef::new(module.id().clone(), section.id().clone()))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Module, Section};
    use crate::time::fixed_now;

    fn section(id: &str, checkboxes: u32) -> Section {
        Section::new(id, format!("Title for {id}"), None, checkboxes).unwrap()
    }

    fn path() -> LearningPath {
        LearningPath::new(
            "bitcoin",
            "Bitcoin",
            vec![
                Module::new(
                    "bitcoin-fundamentals",
                    "Bitcoin Fundamentals",
                    Difficulty::Beginner,
                    vec![section("what-is-bitcoin", 3), section("the-blockchain", 2)],
                )
                .unwrap(),
                Module::new(
                    "bitcoin-in-practice",
                    "Bitcoin in Practice",
                    Difficulty::Intermediate,
                    vec![section("wallets-and-keys", 2), section("running-a-node", 0)],
                )
                .unwrap(),
            ],
        )
        .unwrap()
    }

    fn complete(progress: &mut PathProgress, module: &str, section_id: &str, checkboxes: u32) {
        progress
            .ensure_section(&ModuleId::new(module), &SectionId::new(section_id), checkboxes)
            .mark_complete(fixed_now());
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(rounded_percent(0, 3), 0);
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(1, 6), 17);
        assert_eq!(rounded_percent(5, 6), 83);
        assert_eq!(rounded_percent(0, 0), 0);
    }

    #[test]
    fn unknown_sections_report_zero() {
        let path = path();
        let progress = PathProgress::new();
        assert_eq!(
            section_percent(
                &path,
                &progress,
                &ModuleId::new("no-such-module"),
                &SectionId::new("what-is-bitcoin")
            ),
            0
        );
        assert_eq!(module_percent(&path, &progress, &ModuleId::new("no-such-module")), 0);
    }

    #[test]
    fn module_percent_averages_over_all_sections() {
        let path = path();
        let mut progress = PathProgress::new();
        let fundamentals = ModuleId::new("bitcoin-fundamentals");

        progress
            .ensure_section(&fundamentals, &SectionId::new("what-is-bitcoin"), 3)
            .toggle_checkbox(0, fixed_now());

        // 33% and an unstarted 0% average to 17%.
        assert_eq!(module_percent(&path, &progress, &fundamentals), 17);

        complete(&mut progress, "bitcoin-fundamentals", "what-is-bitcoin", 3);
        assert_eq!(module_percent(&path, &progress, &fundamentals), 50);

        complete(&mut progress, "bitcoin-fundamentals", "the-blockchain", 2);
        assert_eq!(module_percent(&path, &progress, &fundamentals), 100);
        assert!(module_is_complete(&path, &progress, &fundamentals));
    }

    #[test]
    fn first_section_is_never_locked() {
        let path = path();
        let progress = PathProgress::new();
        assert!(!is_section_locked(
            &path,
            &progress,
            &ModuleId::new("bitcoin-fundamentals"),
            &SectionId::new("what-is-bitcoin")
        ));
    }

    #[test]
    fn lock_follows_the_predecessor_chain() {
        let path = path();
        let mut progress = PathProgress::new();
        let fundamentals = ModuleId::new("bitcoin-fundamentals");
        let blockchain = SectionId::new("the-blockchain");

        assert!(is_section_locked(&path, &progress, &fundamentals, &blockchain));

        complete(&mut progress, "bitcoin-fundamentals", "what-is-bitcoin", 3);
        assert!(!is_section_locked(&path, &progress, &fundamentals, &blockchain));
    }

    #[test]
    fn module_boundary_is_gated_by_previous_module() {
        let path = path();
        let mut progress = PathProgress::new();
        let practice = ModuleId::new("bitcoin-in-practice");
        let wallets = SectionId::new("wallets-and-keys");

        complete(&mut progress, "bitcoin-fundamentals", "what-is-bitcoin", 3);
        assert!(is_section_locked(&path, &progress, &practice, &wallets));

        complete(&mut progress, "bitcoin-fundamentals", "the-blockchain", 2);
        assert!(!is_section_locked(&path, &progress, &practice, &wallets));
    }

    #[test]
    fn unknown_sections_are_not_locked() {
        let path = path();
        let progress = PathProgress::new();
        assert!(!is_section_locked(
            &path,
            &progress,
            &ModuleId::new("bitcoin-fundamentals"),
            &SectionId::new("no-such-section")
        ));
    }

    #[test]
    fn partial_predecessor_keeps_successor_locked() {
        let path = path();
        let mut progress = PathProgress::new();
        let fundamentals = ModuleId::new("bitcoin-fundamentals");

        progress
            .ensure_section(&fundamentals, &SectionId::new("what-is-bitcoin"), 3)
            .toggle_checkbox(0, fixed_now());

        assert!(is_section_locked(
            &path,
            &progress,
            &fundamentals,
            &SectionId::new("the-blockchain")
        ));
    }

    #[test]
    fn next_incomplete_walks_the_path_in_order() {
        let path = path();
        let mut progress = PathProgress::new();

        let next = next_incomplete_section(&path, &progress).unwrap();
        assert_eq!(next.module, ModuleId::new("bitcoin-fundamentals"));
        assert_eq!(next.section, SectionId::new("what-is-bitcoin"));

        complete(&mut progress, "bitcoin-fundamentals", "what-is-bitcoin", 3);
        complete(&mut progress, "bitcoin-fundamentals", "the-blockchain", 2);

        let next = next_incomplete_section(&path, &progress).unwrap();
        assert_eq!(next.module, ModuleId::new("bitcoin-in-practice"));
        assert_eq!(next.section, SectionId::new("wallets-and-keys"));
    }

    #[test]
    fn next_incomplete_is_none_when_path_complete() {
        let path = path();
        let mut progress = PathProgress::new();
        complete(&mut progress, "bitcoin-fundamentals", "what-is-bitcoin", 3);
        complete(&mut progress, "bitcoin-fundamentals", "the-blockchain", 2);
        complete(&mut progress, "bitcoin-in-practice", "wallets-and-keys", 2);
        complete(&mut progress, "bitcoin-in-practice", "running-a-node", 0);

        assert!(next_incomplete_section(&path, &progress).is_none());
        assert_eq!(path_percent(&path, &progress), 100);
    }

    #[test]
    fn zero_checkbox_section_gates_nothing_until_marked() {
        let path = path();
        let mut progress = PathProgress::new();
        let practice = ModuleId::new("bitcoin-in-practice");
        let node = SectionId::new("running-a-node");

        assert_eq!(section_percent(&path, &progress, &practice, &node), 0);

        complete(&mut progress, "bitcoin-in-practice", "running-a-node", 0);
        assert_eq!(section_percent(&path, &progress, &practice, &node), 100);
    }

    #[test]
    fn persisted_state_longer_than_catalog_is_capped() {
        let path = path();
        let mut progress = PathProgress::new();
        let fundamentals = ModuleId::new("bitcoin-fundamentals");
        let blockchain = SectionId::new("the-blockchain");

        // Five states persisted for a two-checkbox section.
        let stale = SectionProgress::from_persisted(vec![true, false, true, true, true], None);
        progress.ensure_module(&fundamentals);
        *progress.ensure_section(&fundamentals, &blockchain, 5) = stale;

        assert_eq!(section_percent(&path, &progress, &fundamentals, &blockchain), 50);
    }
}
