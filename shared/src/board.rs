//! Static session content: the board, the quiz bank and the colour palette.

use crate::model::{Tile, TileKind};

pub const WELCOME_LOG: &str = "Welcome to EcoPoly! Create or join a game.";

/// Red, blue, green, yellow. Assigned by join order, wrapping.
pub const PLAYER_COLORS: [&str; 4] = ["#ef4444", "#3b82f6", "#10b981", "#f59e0b"];

/// A knowledge check gating a property purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct_index: usize,
    pub fact: &'static str,
}

impl Question {
    pub fn correct_answer(&self) -> &'static str {
        self.options[self.correct_index]
    }
}

pub const QUESTIONS: &[Question] = &[
    Question {
        id: 1,
        question: "Which SDG aims to end poverty in all its forms everywhere?",
        options: &[
            "Goal 1: No Poverty",
            "Goal 5: Gender Equality",
            "Goal 13: Climate Action",
            "Goal 10: Reduced Inequalities",
        ],
        correct_index: 0,
        fact: "Goal 1 aims to eradicate extreme poverty for all people everywhere by 2030.",
    },
    Question {
        id: 2,
        question: "What is the main focus of SDG 13?",
        options: &[
            "Life Below Water",
            "Quality Education",
            "Climate Action",
            "Zero Hunger",
        ],
        correct_index: 2,
        fact: "SDG 13 urges us to take urgent action to combat climate change and its impacts.",
    },
    Question {
        id: 3,
        question: "Which goal promotes inclusive and equitable quality education?",
        options: &["Goal 3", "Goal 4", "Goal 8", "Goal 9"],
        correct_index: 1,
        fact: "Goal 4 ensures inclusive and equitable quality education and promotes lifelong learning opportunities for all.",
    },
    Question {
        id: 4,
        question: "SDG 7 focuses on affordable and clean...?",
        options: &["Water", "Energy", "Air", "Food"],
        correct_index: 1,
        fact: "Goal 7 aims to ensure access to affordable, reliable, sustainable and modern energy for all.",
    },
    Question {
        id: 5,
        question: "Which goal aims to conserve and sustainably use the oceans?",
        options: &[
            "Goal 15: Life on Land",
            "Goal 6: Clean Water",
            "Goal 14: Life Below Water",
            "Goal 12: Responsible Consumption",
        ],
        correct_index: 2,
        fact: "Goal 14 focuses on conserving and sustainably using the oceans, seas and marine resources.",
    },
];

/// The 20-tile board, ids equal to positions.
pub fn initial_tiles() -> Vec<Tile> {
    vec![
        Tile::special(0, "GO", TileKind::Start, Some("Collect $200")),
        Tile::property(1, "Solar Field", 60, 2, "brown"),
        Tile::special(2, "Community Chest", TileKind::Chance, None),
        Tile::property(3, "Wind Farm", 60, 4, "brown"),
        Tile::tax(4, "Carbon Tax", 100),
        Tile::property(5, "Hydro Plant", 100, 6, "light_blue"),
        Tile::property(6, "Recycling Ctr", 100, 6, "light_blue"),
        Tile::property(7, "Bio Lab", 120, 8, "light_blue"),
        Tile::special(8, "Eco Prison", TileKind::Jail, Some("Just Visiting")),
        Tile::property(9, "Urban Garden", 140, 10, "pink"),
        Tile::property(10, "Green School", 140, 10, "pink"),
        Tile::property(11, "Eco University", 160, 12, "pink"),
        Tile::special(12, "Public Park", TileKind::Parking, Some("Free Resting")),
        Tile::property(13, "Electric Bus", 180, 14, "orange"),
        Tile::special(14, "Chance", TileKind::Chance, None),
        Tile::property(15, "Metro Line", 200, 16, "orange"),
        Tile::property(16, "Forest Reserve", 220, 18, "red"),
        Tile::property(17, "Ocean Cleanup", 220, 18, "red"),
        Tile::property(18, "Clean Water", 240, 20, "red"),
        Tile::property(19, "Global Summit", 350, 35, "blue"),
    ]
}
