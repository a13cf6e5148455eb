//! Contraction <-> expansion equivalence table.
//!
//! Dictation transcripts and hand-typed sentences disagree constantly on
//! contraction form ("don't" vs "do not"), so the table below is consulted
//! whenever two tokens fail an exact match.

const CONTRACTIONS: &[(&str, &str)] = &[
    ("i'm", "i am"),
    ("i've", "i have"),
    ("i'll", "i will"),
    ("i'd", "i would"),
    ("you're", "you are"),
    ("you've", "you have"),
    ("you'll", "you will"),
    ("you'd", "you would"),
    ("he's", "he is"),
    ("he'll", "he will"),
    ("he'd", "he would"),
    ("she's", "she is"),
    ("she'll", "she will"),
    ("she'd", "she would"),
    ("it's", "it is"),
    ("it'll", "it will"),
    ("it'd", "it would"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("we'll", "we will"),
    ("we'd", "we would"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("they'll", "they will"),
    ("they'd", "they would"),
    ("that's", "that is"),
    ("that'll", "that will"),
    ("that'd", "that would"),
    ("there's", "there is"),
    ("there'll", "there will"),
    ("there'd", "there would"),
    ("who's", "who is"),
    ("who'll", "who will"),
    ("who'd", "who would"),
    ("what's", "what is"),
    ("what're", "what are"),
    ("what'll", "what will"),
    ("where's", "where is"),
    ("when's", "when is"),
    ("why's", "why is"),
    ("how's", "how is"),
    ("let's", "let us"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("wasn't", "was not"),
    ("weren't", "were not"),
    ("haven't", "have not"),
    ("hasn't", "has not"),
    ("hadn't", "had not"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("don't", "do not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("can't", "cannot"),
    ("couldn't", "could not"),
    ("shouldn't", "should not"),
    ("mustn't", "must not"),
    ("mightn't", "might not"),
    ("needn't", "need not"),
    ("y'all", "you all"),
    ("gonna", "going to"),
    ("wanna", "want to"),
    ("gotta", "got to"),
    ("kinda", "kind of"),
    ("sorta", "sort of"),
    ("lemme", "let me"),
    ("gimme", "give me"),
    ("dunno", "do not know"),
    ("ain't", "is not"),
];

/// Expands a contracted token into its canonical multi-word form, if known.
pub fn expand(token: &str) -> Option<&'static str> {
    CONTRACTIONS
        .iter()
        .find(|(c, _)| *c == token)
        .map(|(_, e)| *e)
}

/// True when `a` and `b` are a contraction/expansion pair of each other
/// (in either direction), comparing whitespace-joined token sequences.
pub fn contraction_equivalent(a: &str, b: &str) -> bool {
    if let Some(expanded) = expand(a) {
        if expanded == b {
            return true;
        }
    }
    if let Some(expanded) = expand(b) {
        if expanded == a {
            return true;
        }
    }
    false
}
