// src/noyau/config.rs
//
// Réglages d’une évaluation (seuils de débordement, précision, rendu).

/// Au-delà de ce nombre de chiffres décimaux estimés, `^` rend une approximation.
pub const MAX_CHIFFRES_DEFAUT: f64 = 10_000.0;

/// Plus grand exposant entier calculé exactement (BigInt::pow).
pub const PLAFOND_EXPOSANT_EXACT: u64 = 1_000_000;

/// Précision des flottants, en bits de mantisse.
pub const PRECISION_DEFAUT: u32 = 256;

pub const PRECISION_MIN: u32 = 16;
pub const PRECISION_MAX: u32 = 65_536;

/// Chiffres significatifs des rendus flottants.
pub const CHIFFRES_SIGNIFICATIFS: usize = 12;

/// Décimales fixes du résultat de `to`.
pub const DECIMALES_CONVERSION: usize = 12;

#[derive(Clone, Debug, PartialEq)]
pub struct EvalConfig {
    pub max_chiffres: f64,
    pub plafond_exposant_exact: u64,
    pub precision: u32,
    /// Rendu SI composé même quand une unité nommée conviendrait.
    pub prefere_si: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_chiffres: MAX_CHIFFRES_DEFAUT,
            plafond_exposant_exact: PLAFOND_EXPOSANT_EXACT,
            precision: PRECISION_DEFAUT,
            prefere_si: false,
        }
    }
}

impl EvalConfig {
    pub fn avec_precision(mut self, bits: u32) -> Self {
        self.precision = bits.clamp(PRECISION_MIN, PRECISION_MAX);
        self
    }
}
