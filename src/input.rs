//! Button state as sampled once per UI tick, and the chord rule.
//!
//! A chord is valid only when exactly one button is down.  Any other
//! combination, including several simultaneous presses, reads as "no
//! input" so contact bounce on a neighbouring key cannot double-edit.

/// The four front-panel buttons of the main unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Admin / save.
    Select,
    Cancel,
    /// Increment minute.
    Minute,
    /// Increment hour.
    Hour,
}

/// Debounced level of every button at one sample instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub select: bool,
    pub cancel: bool,
    pub minute: bool,
    pub hour: bool,
}

impl Buttons {
    pub const NONE: Self = Self {
        select: false,
        cancel: false,
        minute: false,
        hour: false,
    };

    /// Only `button` held down.
    pub fn only(button: Button) -> Self {
        let mut b = Self::NONE;
        *b.slot(button) = true;
        b
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Select => self.select,
            Button::Cancel => self.cancel,
            Button::Minute => self.minute,
            Button::Hour => self.hour,
        }
    }

    pub fn pressed_count(&self) -> usize {
        [self.select, self.cancel, self.minute, self.hour]
            .iter()
            .filter(|&&down| down)
            .count()
    }

    /// The single pressed button, or `None` for zero or several.
    pub fn chord(&self) -> Option<Button> {
        if self.pressed_count() != 1 {
            return None;
        }
        [Button::Select, Button::Cancel, Button::Minute, Button::Hour]
            .into_iter()
            .find(|&b| self.is_pressed(b))
    }

    fn slot(&mut self, button: Button) -> &mut bool {
        match button {
            Button::Select => &mut self.select,
            Button::Cancel => &mut self.cancel,
            Button::Minute => &mut self.minute,
            Button::Hour => &mut self.hour,
        }
    }
}
