/// Compile a regex literal once and hand out a `&'static Regex`.
///
/// Only used for patterns fixed at build time (reference grammar, verse
/// cleanup, separators); rule patterns built from user input go through
/// `matching::Compiler` instead.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("static regex must compile"));
        &*RE
    }};
}
