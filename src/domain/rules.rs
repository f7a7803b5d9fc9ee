/// Interaction rules: what a hero–spider contact means.
///
/// Pure functions, no side effects. The step function applies the outcome.
///
/// ## Contact table
///
/// ┌──────────────────────────────┬──────────────────────────────┐
/// │ Hero vertical velocity        │ Outcome                      │
/// ├──────────────────────────────┼──────────────────────────────┤
/// │ > 0 (falling onto spider)     │ Stomp: spider dies, bounce   │
/// │ ≤ 0 (rising, level, sideways) │ Fatal: level restarts        │
/// └──────────────────────────────┴──────────────────────────────┘
///
/// ## Simultaneous contacts
///
/// The hero's vertical velocity is sampled once, before any contact in the
/// frame is applied, and every overlapping spider is judged against that
/// sample. A bounce from the first stomp therefore cannot turn a second,
/// simultaneous landing into a death, and the outcome does not depend on the
/// order the spiders are stored in.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    Stomp,
    Fatal,
}

/// Classify a single contact from the hero's vertical velocity.
pub fn classify_contact(hero_vy: f32) -> Contact {
    if hero_vy > 0.0 { Contact::Stomp } else { Contact::Fatal }
}

/// Resolved result of all hero–spider contacts in one frame.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ContactOutcome {
    /// Spider indices that get stomped, in the order given.
    pub stomped: Vec<usize>,
    /// Whether the hero dies (level restart).
    pub fatal: bool,
}

/// Resolve every spider overlapping the hero this frame.
pub fn resolve_contacts(hero_vy: f32, overlapping: &[usize]) -> ContactOutcome {
    if overlapping.is_empty() {
        return ContactOutcome::default();
    }
    match classify_contact(hero_vy) {
        Contact::Stomp => ContactOutcome { stomped: overlapping.to_vec(), fatal: false },
        Contact::Fatal => ContactOutcome { stomped: vec![], fatal: true },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_is_a_stomp() {
        assert_eq!(classify_contact(50.0), Contact::Stomp);
        assert_eq!(classify_contact(0.01), Contact::Stomp);
    }

    #[test]
    fn rising_or_level_is_fatal() {
        assert_eq!(classify_contact(-10.0), Contact::Fatal);
        assert_eq!(classify_contact(0.0), Contact::Fatal);
    }

    #[test]
    fn simultaneous_landing_stomps_every_spider() {
        let out = resolve_contacts(120.0, &[2, 0]);
        assert_eq!(out.stomped, vec![2, 0]);
        assert!(!out.fatal);
    }

    #[test]
    fn simultaneous_side_contact_is_one_death() {
        let out = resolve_contacts(0.0, &[0, 1]);
        assert!(out.stomped.is_empty());
        assert!(out.fatal);
    }

    #[test]
    fn no_contact_no_outcome() {
        assert_eq!(resolve_contacts(-600.0, &[]), ContactOutcome::default());
    }
}
