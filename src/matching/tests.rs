use crate::error::Error;
use crate::matching::{Compiler, KeywordRule, MatchFlags, RuleSet};

fn rules(compiler: &Compiler, list: &[KeywordRule]) -> RuleSet {
    let mut set = RuleSet::new();
    for rule in list {
        set.add(compiler, rule).unwrap();
    }
    set
}

fn word(s: &str) -> String {
    s.to_string()
}

#[test]
fn admission_needs_all_mandatory_one_of_and_no_forbidden() {
    let set = rules(
        &Compiler::default(),
        &[
            KeywordRule::Mandatory(word("light")),
            KeywordRule::OneOf(word("day")),
            KeywordRule::OneOf(word("night")),
            KeywordRule::Forbidden(word("darkness")),
        ],
    );

    assert!(set.admits("In the day there was light"));
    assert!(set.admits("And at night, LIGHT"));
    assert!(!set.admits("In the night there was darkness and light"));
    assert!(!set.admits("In the day there was nothing"));
    assert!(!set.admits("There was light"));
}

#[test]
fn empty_rule_set_admits_everything() {
    let set = RuleSet::new();
    assert!(set.is_empty());
    assert!(set.admits(""));
    assert!(set.admits("Au commencement"));
}

#[test]
fn phrases_and_ranges_join_the_one_of_group() {
    let set = rules(
        &Compiler::default(),
        &[
            KeywordRule::ExactPhrase(word("au commencement")),
            KeywordRule::NumberRange { low: 3, high: Some(4) },
        ],
    );
    assert_eq!(set.counts(), (0, 2, 0));
    assert!(set.admits("Au commencement, Dieu créa"));
    assert!(set.admits("Il y eut trois jours"));
    assert!(!set.admits("Il y eut deux jours"));
}

#[test]
fn accents_fold_unless_sensitive() {
    let folding = Compiler::default().keyword("eternel").unwrap();
    assert!(folding.is_match("L'Éternel dit"));
    assert!(folding.is_match("l'éternel"));

    let sensitive = Compiler::new(MatchFlags::WHOLE_WORD | MatchFlags::ACCENT_SENSITIVE).keyword("eternel").unwrap();
    assert!(!sensitive.is_match("L'Éternel dit"));
    assert!(sensitive.is_match("le pacte eternel"));
}

#[test]
fn case_folds_unless_sensitive() {
    let sensitive = Compiler::new(MatchFlags::WHOLE_WORD | MatchFlags::CASE_SENSITIVE).keyword("Dieu").unwrap();
    assert!(sensitive.is_match("Et Dieu vit"));
    assert!(!sensitive.is_match("le dieu des nations"));

    let folding = Compiler::default().keyword("Dieu").unwrap();
    assert!(folding.is_match("le dieu des nations"));
}

#[test]
fn whole_words_unless_disabled() {
    let whole = Compiler::default().keyword("roi").unwrap();
    assert!(whole.is_match("le roi David"));
    assert!(!whole.is_match("les rois"));
    assert!(!whole.is_match("le royaume"));

    let partial = Compiler::new(MatchFlags::empty()).keyword("roi").unwrap();
    assert!(partial.is_match("les rois"));
}

#[test]
fn punctuation_is_matched_literally() {
    let m = Compiler::new(MatchFlags::empty()).keyword("(1.2)").unwrap();
    assert!(m.is_match("voir (1.2) plus haut"));
    assert!(!m.is_match("voir 132 plus haut"));
}

#[test]
fn empty_keyword_is_rejected() {
    assert!(matches!(Compiler::default().keyword(""), Err(Error::InvalidArgument(_))));
}

#[test]
fn single_number_does_not_match_inside_larger_numbers() {
    let two = Compiler::default().number_range(2, None).unwrap();

    assert!(two.is_match("2 brebis"));
    assert!(two.is_match("deux brebis"));
    assert!(two.is_match("Deux brebis"));

    assert!(!two.is_match("20 brebis"));
    assert!(!two.is_match("en 1992"));
    assert!(!two.is_match("vingt-deux brebis"));
    assert!(!two.is_match("vingt deux brebis"));
    assert!(!two.is_match("deux cents brebis"));
    assert!(!two.is_match("deux-mille brebis"));
}

#[test]
fn guards_look_past_the_first_rejected_candidate() {
    let two = Compiler::default().number_range(2, None).unwrap();
    assert_eq!(two.find_spans("vingt-deux et deux"), vec![14..18]);
}

#[test]
fn spelled_tens_are_not_cut_from_compounds() {
    let twenty = Compiler::default().number_range(20, None).unwrap();
    assert!(twenty.is_match("vingt ans"));
    assert!(!twenty.is_match("vingt-et-un ans"));
    assert!(!twenty.is_match("vingt-deux ans"));
    assert!(!twenty.is_match("quatre-vingt ans"));

    let sixty = Compiler::default().number_range(60, None).unwrap();
    assert!(!sixty.is_match("soixante-dix ans"));
}

#[test]
fn units_are_not_cut_from_et_compounds() {
    let one = Compiler::default().number_range(1, None).unwrap();
    assert!(!one.is_match("vingt-et-un brebis"));
    assert!(!one.is_match("trente et un ans"));
    assert!(!one.is_match("Soixante-Et-Un"));
    assert!(one.is_match("un berger"));
    assert!(one.is_match("sept pains et un poisson"));

    let eleven = Compiler::default().number_range(11, None).unwrap();
    assert!(!eleven.is_match("soixante-et-onze ans"));
    assert!(eleven.is_match("les onze disciples"));
}

#[test]
fn range_matches_either_separator_style() {
    let m = Compiler::default().number_range(20, Some(22)).unwrap();
    assert_eq!(m.find_spans("vingt-et-un"), vec![0..11]);
    assert!(m.is_match("vingt et un"));
    assert!(m.is_match("vingt deux"));
    assert!(m.is_match("21"));
    assert!(!m.is_match("23"));

    let seventy = Compiler::default().number_range(70, Some(71)).unwrap();
    assert!(seventy.is_match("soixante-et-onze"));
    assert!(seventy.is_match("soixante dix"));
}

#[test]
fn case_sensitive_ranges_keep_case() {
    let m = Compiler::new(MatchFlags::CASE_SENSITIVE).number_range(3, None).unwrap();
    assert!(m.is_match("trois"));
    assert!(!m.is_match("Trois"));
}

#[test]
fn invalid_ranges_are_rejected() {
    let c = Compiler::default();
    assert!(matches!(c.number_range(5, Some(5)), Err(Error::InvalidArgument(_))));
    assert!(matches!(c.number_range(5, Some(3)), Err(Error::InvalidArgument(_))));
    assert!(matches!(c.number_range(-1, None), Err(Error::InvalidArgument(_))));
    assert!(matches!(c.number_range(1, Some(-4)), Err(Error::InvalidArgument(_))));
}

#[test]
fn oversized_ranges_fail_before_expansion() {
    let c = Compiler::default();
    assert!(matches!(c.number_range(0, Some(3_000_000)), Err(Error::InvalidArgument(_))));
    assert!(matches!(c.number_range(0, Some(i64::MAX)), Err(Error::InvalidArgument(_))));
    assert!(matches!(c.number_range(5, Some(10_005)), Err(Error::InvalidArgument(_))));
    assert!(c.number_range(0, Some(120)).is_ok());
}

#[test]
fn highlight_wraps_each_match() {
    let set = rules(&Compiler::default(), &[KeywordRule::Mandatory(word("lumière"))]);
    assert_eq!(set.highlight("Que la lumière soit ! Et la lumière fut.", "*"), "Que la *lumière* soit ! Et la *lumière* fut.");
}

#[test]
fn highlight_ignores_forbidden_rules() {
    let set = rules(
        &Compiler::default(),
        &[KeywordRule::OneOf(word("jour")), KeywordRule::Forbidden(word("nuit"))],
    );
    assert_eq!(set.highlight("le jour et la nuit", "_"), "le _jour_ et la nuit");
}

#[test]
fn highlight_applies_rules_in_order_over_rewritten_text() {
    let set = rules(
        &Compiler::default(),
        &[
            KeywordRule::OneOf(word("lumière")),
            KeywordRule::Mandatory(word("lumière")),
            KeywordRule::NumberRange { low: 1, high: None },
        ],
    );
    // Both lumière rules wrap the same word; "un" is not a whole word in "une".
    assert_eq!(set.highlight("une lumière", "#"), "une ##lumière##");
}

#[test]
fn highlight_is_not_idempotent() {
    let set = rules(&Compiler::default(), &[KeywordRule::Mandatory(word("pain"))]);
    let once = set.highlight("le pain", "*");
    assert_eq!(once, "le *pain*");
    assert_eq!(set.highlight(&once, "*"), "le **pain**");
}

#[test]
fn markers_are_inserted_verbatim() {
    let set = rules(&Compiler::default(), &[KeywordRule::Mandatory(word("pain"))]);
    assert_eq!(set.highlight("le pain", "$1"), "le $1pain$1");
}

#[test]
fn clear_empties_every_group() {
    let mut set = rules(
        &Compiler::default(),
        &[
            KeywordRule::Mandatory(word("a")),
            KeywordRule::OneOf(word("b")),
            KeywordRule::Forbidden(word("c")),
        ],
    );
    assert_eq!(set.counts(), (1, 1, 1));
    set.clear();
    assert!(set.is_empty());
}
