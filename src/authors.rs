//! Known article authors.
//!
//! Front-matter names an author by display name. Names found here get a
//! credentialed author box and a specific `jobTitle` in structured data;
//! anything else is rendered as a plain byline.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Author {
    pub name: &'static str,
    pub title: &'static str,
    pub bio: &'static str,
    pub credentials: &'static [&'static str],
    pub affiliation: &'static str,
}

pub static AUTHORS: &[Author] = &[
    Author {
        name: "Dr. Sarah Chen, MD",
        title: "Board-Certified Infectious Disease Specialist",
        bio: "Dr. Chen is a board-certified infectious disease physician with over 15 years of experience in clinical practice and medical research. She specializes in parasitic infections and global health initiatives.",
        credentials: &["MD", "FACP", "FIDSA"],
        affiliation: "Medical Research Blog Editorial Team",
    },
    Author {
        name: "Dr. Michael Rodriguez",
        title: "Clinical Research Director",
        bio: "Dr. Rodriguez leads clinical research initiatives focusing on pharmaceutical efficacy and safety. His work has been published in leading medical journals.",
        credentials: &["MD", "PhD"],
        affiliation: "Medical Research Blog Editorial Team",
    },
];

pub fn find_author(name: &str) -> Option<&'static Author> {
    AUTHORS.iter().find(|a| a.name == name)
}
