use crate::ui::rgb::{CORAL, ELECTRIC_PURPLE, ELECTRIC_YELLOW, NEON_CYAN, SUCCESS_GREEN};
use colored::{ColoredString, Colorize};
use rand::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct ColoredMessage {
    pub text: &'static str,
    pub color: (u8, u8, u8),
}

impl ColoredMessage {
    const fn new(text: &'static str, color: (u8, u8, u8)) -> Self {
        Self { text, color }
    }

    pub fn styled(&self) -> ColoredString {
        self.text.truecolor(self.color.0, self.color.1, self.color.2)
    }
}

static WAITING_MESSAGES: &[ColoredMessage] = &[
    ColoredMessage::new("📝 Drafting the overview...", ELECTRIC_PURPLE),
    ColoredMessage::new("🔍 Reading between the lines of your notes...", NEON_CYAN),
    ColoredMessage::new("🧩 Breaking ideas into atomic requirements...", CORAL),
    ColoredMessage::new("📎 Studying the attached documents...", ELECTRIC_YELLOW),
    ColoredMessage::new("🏷️ Numbering user requirements...", SUCCESS_GREEN),
    ColoredMessage::new("⚖️ Weighing functional against non-functional...", NEON_CYAN),
    ColoredMessage::new("🧱 Laying out the constraints...", ELECTRIC_PURPLE),
    ColoredMessage::new("🗂️ Sorting requirements into groups...", CORAL),
    ColoredMessage::new("✨ Polishing the key features...", ELECTRIC_YELLOW),
    ColoredMessage::new("📐 Measuring scope twice, writing once...", SUCCESS_GREEN),
    ColoredMessage::new("🧭 Finding the core user needs...", NEON_CYAN),
    ColoredMessage::new("🖋️ Turning notes into a specification...", ELECTRIC_PURPLE),
];

static FILE_MESSAGES: &[ColoredMessage] = &[
    ColoredMessage::new("📂 Reading your files...", NEON_CYAN),
    ColoredMessage::new("📦 Packing attachments for the trip...", CORAL),
    ColoredMessage::new("🔐 Encoding documents...", ELECTRIC_PURPLE),
];

pub fn get_waiting_message() -> ColoredMessage {
    let mut rng = rand::rng();
    WAITING_MESSAGES
        .choose(&mut rng)
        .copied()
        .unwrap_or(ColoredMessage::new("Generating requirements...", ELECTRIC_YELLOW))
}

pub fn get_file_message() -> ColoredMessage {
    let mut rng = rand::rng();
    FILE_MESSAGES
        .choose(&mut rng)
        .copied()
        .unwrap_or(ColoredMessage::new("Loading files...", NEON_CYAN))
}
