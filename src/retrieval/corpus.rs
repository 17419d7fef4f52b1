//! Built-in party-planning knowledge base.

use super::SourceDocument;

const PARTY_IDEAS: [(&str, &str); 5] = [
    (
        "A superhero-themed masquerade ball with luxury decor, including gold accents and velvet curtains.",
        "Party Ideas 1",
    ),
    (
        "Hire a professional DJ who can play themed music for superheroes like Batman and Wonder Woman.",
        "Entertainment Ideas",
    ),
    (
        "For catering, serve dishes named after superheroes, like 'The Hulk's Green Smoothie' and 'Iron Man's Power Steak.'",
        "Catering Ideas",
    ),
    (
        "Decorate with iconic superhero logos and projections of Gotham and other superhero cities around the venue.",
        "Decoration Ideas",
    ),
    (
        "Interactive experiences with VR where guests can engage in superhero simulations or compete in themed games.",
        "Entertainment Ideas",
    ),
];

/// The five built-in party ideas, each tagged with its source.
pub fn party_ideas() -> Vec<SourceDocument> {
    PARTY_IDEAS
        .iter()
        .map(|(text, source)| SourceDocument::new(*text, *source))
        .collect()
}
