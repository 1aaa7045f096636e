use typed_builder::TypedBuilder;

/// Behaviours that differ between historical CHIP-8 interpreters.
///
/// Fixed for the lifetime of a `Cpu`. `Quirks::default()` is the modern
/// (CHIP-48 / SUPER-CHIP flavoured) set most current ROMs expect;
/// `Quirks::cosmac_vip()` matches the original COSMAC VIP interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct Quirks {
    /// 8XY1/8XY2/8XY3 clear VF after the logic op.
    #[builder(default = false)]
    pub logic_resets_vf: bool,
    /// 8XY6/8XYE copy VY into VX before shifting instead of shifting VX in place.
    #[builder(default = false)]
    pub shift_uses_vy: bool,
    /// FX55/FX65 leave I pointing past the last register transferred.
    #[builder(default = false)]
    pub load_store_increments_index: bool,
    /// DXYN wraps pixels past the right/bottom edge instead of clipping them.
    #[builder(default = false)]
    pub wrap_sprites: bool,
    /// DXYN draws N + 1 rows, matching interpreters with an inclusive row loop.
    #[builder(default = false)]
    pub inclusive_sprite_height: bool,
    /// FX1E sets VF to 1 when I leaves the 12-bit address space, 0 otherwise.
    #[builder(default = false)]
    pub index_overflow_sets_vf: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self::modern()
    }
}

impl Quirks {
    pub fn modern() -> Self {
        Self::builder().build()
    }

    pub fn cosmac_vip() -> Self {
        Self::builder()
            .logic_resets_vf(true)
            .shift_uses_vy(true)
            .load_store_increments_index(true)
            .build()
    }

    /// Look up a preset by name, as accepted on the command line.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "modern" | "schip" | "chip48" => Some(Self::modern()),
            "vip" | "cosmac" | "cosmac-vip" => Some(Self::cosmac_vip()),
            _ => None,
        }
    }
}
