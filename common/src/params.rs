use serde::Deserialize;

/// Tuning values for one pipeline pass.
///
/// Region and size fields are percentages; hue follows the 8-bit HSV
/// convention (0..=180), saturation and value span 0..=255. A set that reached
/// the pipeline has passed [`ParameterSet::validate`] or was produced by
/// [`ParameterSet::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub region_x: u32,
    pub region_y: u32,
    pub region_width: u32,
    pub region_height: u32,
    pub size_min: u32,
    pub size_max: u32,
    pub hue_min: u32,
    pub hue_max: u32,
    pub sat_min: u32,
    pub sat_max: u32,
    pub val_min: u32,
    pub val_max: u32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            region_x: 0,
            region_y: 0,
            region_width: 100,
            region_height: 100,
            size_min: 0,
            size_max: 100,
            hue_min: 0,
            hue_max: Control::HueMax.max(),
            sat_min: 0,
            sat_max: Control::SatMax.max(),
            val_min: 0,
            val_max: Control::ValMax.max(),
        }
    }
}

/// One adjustable field of a [`ParameterSet`], the unit an operator moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    RegionX,
    RegionY,
    RegionWidth,
    RegionHeight,
    SizeMin,
    SizeMax,
    HueMin,
    HueMax,
    SatMin,
    SatMax,
    ValMin,
    ValMax,
}

/// (min, max) pairs that must stay ordered.
const ORDERED_PAIRS: [(Control, Control); 4] = [
    (Control::SizeMin, Control::SizeMax),
    (Control::HueMin, Control::HueMax),
    (Control::SatMin, Control::SatMax),
    (Control::ValMin, Control::ValMax),
];

impl Control {
    pub const ALL: [Control; 12] = [
        Control::RegionX,
        Control::RegionY,
        Control::RegionWidth,
        Control::RegionHeight,
        Control::SizeMin,
        Control::SizeMax,
        Control::HueMin,
        Control::HueMax,
        Control::SatMin,
        Control::SatMax,
        Control::ValMin,
        Control::ValMax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Control::RegionX => "region_x",
            Control::RegionY => "region_y",
            Control::RegionWidth => "region_width",
            Control::RegionHeight => "region_height",
            Control::SizeMin => "size_min",
            Control::SizeMax => "size_max",
            Control::HueMin => "hue_min",
            Control::HueMax => "hue_max",
            Control::SatMin => "sat_min",
            Control::SatMax => "sat_max",
            Control::ValMin => "val_min",
            Control::ValMax => "val_max",
        }
    }

    /// Inclusive upper bound of the control. Every control starts at 0.
    pub fn max(self) -> u32 {
        match self {
            Control::HueMin | Control::HueMax => 180,
            Control::SatMin | Control::SatMax | Control::ValMin | Control::ValMax => 255,
            _ => 100,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl ParameterSet {
    pub fn get(&self, control: Control) -> u32 {
        match control {
            Control::RegionX => self.region_x,
            Control::RegionY => self.region_y,
            Control::RegionWidth => self.region_width,
            Control::RegionHeight => self.region_height,
            Control::SizeMin => self.size_min,
            Control::SizeMax => self.size_max,
            Control::HueMin => self.hue_min,
            Control::HueMax => self.hue_max,
            Control::SatMin => self.sat_min,
            Control::SatMax => self.sat_max,
            Control::ValMin => self.val_min,
            Control::ValMax => self.val_max,
        }
    }

    /// Returns a copy with one control replaced. No validation is applied.
    pub fn with(mut self, control: Control, value: u32) -> Self {
        let slot = match control {
            Control::RegionX => &mut self.region_x,
            Control::RegionY => &mut self.region_y,
            Control::RegionWidth => &mut self.region_width,
            Control::RegionHeight => &mut self.region_height,
            Control::SizeMin => &mut self.size_min,
            Control::SizeMax => &mut self.size_max,
            Control::HueMin => &mut self.hue_min,
            Control::HueMax => &mut self.hue_max,
            Control::SatMin => &mut self.sat_min,
            Control::SatMax => &mut self.sat_max,
            Control::ValMin => &mut self.val_min,
            Control::ValMax => &mut self.val_max,
        };
        *slot = value;
        self
    }

    /// Checks every control against its range and every min/max pair for order.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for control in Control::ALL {
            let value = self.get(control);
            if value > control.max() {
                return Err(ParameterError::OutOfRange {
                    name: control.name(),
                    value,
                    max: control.max(),
                });
            }
        }
        for (lo, hi) in ORDERED_PAIRS {
            if self.get(lo) > self.get(hi) {
                return Err(ParameterError::InvertedBounds {
                    min_name: lo.name(),
                    max_name: hi.name(),
                    min: self.get(lo),
                    max: self.get(hi),
                });
            }
        }
        Ok(())
    }

    /// Forces the set into a valid state: values are clamped to their range
    /// and an inverted pair has its max raised to its min.
    pub fn clamped(self) -> Self {
        let mut out = Control::ALL
            .into_iter()
            .fold(self, |acc, c| acc.with(c, acc.get(c).min(c.max())));
        for (lo, hi) in ORDERED_PAIRS {
            if out.get(lo) > out.get(hi) {
                out = out.with(hi, out.get(lo));
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    #[error("{name} = {value} is out of range 0..={max}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        max: u32,
    },
    #[error("{min_name} ({min}) must not exceed {max_name} ({max})")]
    InvertedBounds {
        min_name: &'static str,
        max_name: &'static str,
        min: u32,
        max: u32,
    },
}
