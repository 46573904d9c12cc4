//! The fixed category registry.
//!
//! Five categories, defined at deploy time. Every article is canonically
//! addressed as `/{category}/{article}`, so these slugs double as the first
//! URL segment of the whole site. They are never created or removed at
//! runtime.
//!
//! Each category also carries a hand-authored editorial introduction that
//! sits above the article grid on its listing page.

/// A topical grouping articles are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Symbolic glyph name, rendered as a `data-icon` hook.
    pub icon: &'static str,
    pub intro: &'static Intro,
}

/// Editorial copy shown at the top of a category listing.
#[derive(Debug, PartialEq, Eq)]
pub struct Intro {
    pub h1: &'static str,
    pub lead: &'static str,
    pub sections: &'static [IntroSection],
}

#[derive(Debug, PartialEq, Eq)]
pub struct IntroSection {
    pub title: &'static str,
    pub content: &'static str,
    /// `(link text, href)` pairs pointing at canonical article URLs.
    pub links: &'static [(&'static str, &'static str)],
}

/// Slug of the category unmatched articles fall back to.
pub const DEFAULT_CATEGORY: &str = "medical-uses";

pub static CATEGORIES: &[Category] = &[
    Category {
        slug: "medical-uses",
        title: "Medical Uses & Applications",
        description: "Comprehensive guide to FDA-approved and off-label treatments, including parasitic infections and dermatological conditions.",
        icon: "Stethoscope",
        intro: &Intro {
            h1: "Ivermectin Tablets Medical Uses: FDA-Approved Treatments & Applications",
            lead: "Ivermectin is one of the most important drugs in modern medicine. First developed in the 1970s, it has saved millions of lives.",
            sections: &[
                IntroSection {
                    title: "FDA-Approved Parasitic Infections",
                    content: "Ivermectin is FDA-approved for treating several parasitic conditions with cure rates over 80%.",
                    links: &[
                        (
                            "Parasites Guide",
                            "/medical-uses/ivermectin-for-parasites-types-treated-and-effectiveness",
                        ),
                        (
                            "Uses Overview",
                            "/medical-uses/what-is-ivermectin-used-for-fda-approved-and-off-label-uses",
                        ),
                    ],
                },
                IntroSection {
                    title: "Skin Conditions",
                    content: "Ivermectin treats scabies effectively as an alternative to topical treatments.",
                    links: &[(
                        "Scabies Treatment",
                        "/medical-uses/ivermectin-for-scabies-treatment-protocol-and-success-rates",
                    )],
                },
            ],
        },
    },
    Category {
        slug: "dosage-administration",
        title: "Dosage & Administration",
        description: "Weight-based dosage charts, administration forms (tablet vs liquid), and proper protocols for safe usage.",
        icon: "Pill",
        intro: &Intro {
            h1: "Ivermectin Tablets Dosage & Administration: Weight-Based Dosing Charts",
            lead: "Proper dosing is essential for ivermectin. The drug is dosed by body weight, typically 150-200 mcg per kilogram.",
            sections: &[IntroSection {
                title: "Weight-Based Dosing",
                content: "For most infections, ivermectin is given based on body weight. A 70 kg adult would get about 12 mg.",
                links: &[
                    (
                        "Complete Dosage Guide",
                        "/dosage-administration/ivermectin-dosage-for-humans-complete-guide-by-weight-and-condition",
                    ),
                    (
                        "12mg Tablets",
                        "/dosage-administration/ivermectin-12mg-tablets-complete-usage-guide",
                    ),
                ],
            }],
        },
    },
    Category {
        slug: "safety-side-effects",
        title: "Safety & Side Effects",
        description: "Critical safety information, potential side effects, drug interactions, and warning signs to monitor.",
        icon: "ShieldAlert",
        intro: &Intro {
            h1: "Ivermectin Tablets Safety & Side Effects: What You Need to Know",
            lead: "Ivermectin has an excellent safety record when used correctly. Billions of doses have been given worldwide.",
            sections: &[IntroSection {
                title: "Common Side Effects",
                content: "Most side effects are mild: headache, dizziness, and nausea.",
                links: &[(
                    "Side Effects Guide",
                    "/safety-side-effects/ivermectin-side-effects-complete-safety-guide",
                )],
            }],
        },
    },
    Category {
        slug: "buying-guide",
        title: "Buying Guide & Legal",
        description: "Where to buy, prescription requirements, cost comparisons, and identifying legitimate pharmacy sources.",
        icon: "ShoppingBag",
        intro: &Intro {
            h1: "Ivermectin Tablets Buying Guide: Safe & Legal Purchase Options",
            lead: "Buying ivermectin safely requires knowing where to get legitimate products.",
            sections: &[IntroSection {
                title: "Prescription Requirements",
                content: "In the United States, ivermectin requires a prescription for human use.",
                links: &[(
                    "Get a Prescription",
                    "/buying-guide/how-to-get-ivermectin-prescription-and-access-guide",
                )],
            }],
        },
    },
    Category {
        slug: "research-mechanism",
        title: "Research & Mechanism",
        description: "Scientific analysis of how ivermectin works, its history, clinical trials, and emerging medical research.",
        icon: "Microscope",
        intro: &Intro {
            h1: "Ivermectin Research & Mechanism: How This Nobel Prize Drug Works",
            lead: "Ivermectin's discovery earned the 2015 Nobel Prize.",
            sections: &[IntroSection {
                title: "Mechanism of Action",
                content: "Ivermectin binds to glutamate-gated chloride channels causing paralysis in parasites.",
                links: &[(
                    "Mechanism Explained",
                    "/research-mechanism/how-ivermectin-works-mechanism-of-action-explained",
                )],
            }],
        },
    },
];

/// All categories in registry order.
pub fn all() -> &'static [Category] {
    CATEGORIES
}

pub fn find_category(slug: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.slug == slug)
}

pub fn is_category(slug: &str) -> bool {
    find_category(slug).is_some()
}

/// The fallback category for articles no table entry claims.
pub fn default_category() -> &'static Category {
    // The registry is static and always contains the default slug.
    CATEGORIES
        .iter()
        .find(|c| c.slug == DEFAULT_CATEGORY)
        .unwrap_or(&CATEGORIES[0])
}
