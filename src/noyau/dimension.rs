// src/noyau/dimension.rs
//
// Vecteur de dimension (7 exposants entiers sur les dimensions de base SI)
// -----------------------------------------------------------------------
// Ordre canonique : L M T I Θ N J
//   longueur, masse, temps, courant, température, quantité de matière,
//   intensité lumineuse.
//
// - produit de grandeurs  => somme des vecteurs
// - quotient de grandeurs => différence
// - puissance entière     => multiplication par un scalaire
// Le vecteur nul = sans dimension. Toute opération sortant de i32 rend None.

use std::fmt;

pub const NB_DIMENSIONS: usize = 7;

/// Symbole de l’unité de base SI pour chaque composante (même ordre que le vecteur).
pub const SYMBOLES_BASE: [&str; NB_DIMENSIONS] = ["m", "kg", "s", "A", "K", "mol", "cd"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimension([i32; NB_DIMENSIONS]);

impl Dimension {
    pub const NULLE: Dimension = Dimension([0; NB_DIMENSIONS]);

    pub const LONGUEUR: Dimension = Dimension::base(0);
    pub const MASSE: Dimension = Dimension::base(1);
    pub const TEMPS: Dimension = Dimension::base(2);
    pub const COURANT: Dimension = Dimension::base(3);
    pub const TEMPERATURE: Dimension = Dimension::base(4);
    pub const QUANTITE: Dimension = Dimension::base(5);
    pub const INTENSITE: Dimension = Dimension::base(6);

    pub const fn new(exposants: [i32; NB_DIMENSIONS]) -> Self {
        Dimension(exposants)
    }

    /// Vecteur unitaire de la composante `i`.
    const fn base(i: usize) -> Self {
        let mut p = [0; NB_DIMENSIONS];
        p[i] = 1;
        Dimension(p)
    }

    pub fn exposants(&self) -> &[i32; NB_DIMENSIONS] {
        &self.0
    }

    pub fn est_nulle(&self) -> bool {
        self.0.iter().all(|&p| p == 0)
    }

    fn combine(self, o: Dimension, f: fn(i32, i32) -> Option<i32>) -> Option<Dimension> {
        let mut r = self.0;
        for (a, &b) in r.iter_mut().zip(o.0.iter()) {
            *a = f(*a, b)?;
        }
        Some(Dimension(r))
    }

    pub fn produit(self, o: Dimension) -> Option<Dimension> {
        self.combine(o, i32::checked_add)
    }

    pub fn quotient(self, o: Dimension) -> Option<Dimension> {
        self.combine(o, i32::checked_sub)
    }

    /// Puissance entière d’une grandeur : chaque exposant est multiplié par `n`.
    /// None si un exposant sort de i32.
    pub fn puissance(self, n: i64) -> Option<Dimension> {
        let mut r = [0i32; NB_DIMENSIONS];
        for (dst, &p) in r.iter_mut().zip(self.0.iter()) {
            let v = i64::from(p).checked_mul(n)?;
            *dst = i32::try_from(v).ok()?;
        }
        Some(Dimension(r))
    }
}

/// Forme compacte pour les journaux (ex: `L1 M1 T-2`).
impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LETTRES: [&str; NB_DIMENSIONS] = ["L", "M", "T", "I", "Θ", "N", "J"];
        if self.est_nulle() {
            return write!(f, "1");
        }
        let mut premier = true;
        for (l, &p) in LETTRES.iter().zip(self.0.iter()) {
            if p == 0 {
                continue;
            }
            if !premier {
                write!(f, " ")?;
            }
            write!(f, "{l}{p}")?;
            premier = false;
        }
        Ok(())
    }
}
