// src/noyau/unites.rs
//
// Registre des unités
// -------------------
// Une unité = nom + facteur exact (valeur_dans_l_unité * facteur = valeur SI) + dimension.
// Le registre est construit une fois puis passé par référence (jamais global) :
// les tests peuvent injecter leur propre table.
//
// Résolution d’un texte d’unité, dans l’ordre :
//   1) nom exact
//   2) composé `a/b`, `a.b` (quotient / produit de noms résolus)
//   3) préfixe métrique + unité préfixable (`kN`, `mL`, `GHz`)
//   4) repli historique : un suffixe du texte qui soit un nom exact (journalisé)

use std::collections::HashMap;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive};
use rug::Float;
use tracing::warn;

use super::dimension::Dimension;
use super::erreur::UnitError;
use super::flottant::depuis_rationnel;

/// π sur 80 décimales (facteur du degré).
const PI_80: &str =
    "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899";

/// Tolérance relative du rapprochement par facteur (`to` sans unité portée).
pub const TOLERANCE_FACTEUR: f64 = 1e-12;

/// Préfixes métriques ; `da` avant `d` (plus long d’abord).
const PREFIXES: [(&str, i32); 21] = [
    ("da", 1),
    ("Y", 24),
    ("Z", 21),
    ("E", 18),
    ("P", 15),
    ("T", 12),
    ("G", 9),
    ("M", 6),
    ("k", 3),
    ("h", 2),
    ("d", -1),
    ("c", -2),
    ("m", -3),
    ("u", -6),
    ("µ", -6),
    ("n", -9),
    ("p", -12),
    ("f", -15),
    ("a", -18),
    ("z", -21),
    ("y", -24),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Unite {
    pub nom: String,
    pub facteur: BigRational,
    pub dim: Dimension,
    /// Accepte un préfixe métrique (`k`, `m`, ...).
    pub prefixable: bool,
}

impl Unite {
    pub fn new(nom: &str, facteur: BigRational, dim: Dimension) -> Self {
        Unite {
            nom: nom.to_string(),
            facteur,
            dim,
            prefixable: false,
        }
    }

    pub fn prefixable(mut self) -> Self {
        self.prefixable = true;
        self
    }

    pub fn facteur_flottant(&self, precision: u32) -> Float {
        depuis_rationnel(&self.facteur, precision)
    }

    pub fn facteur_f64(&self) -> f64 {
        self.facteur.to_f64().unwrap_or(f64::NAN)
    }
}

/* ------------------------ Facteurs exacts ------------------------ */

/// n * 10^e10, exact.
fn ratio(n: i64, e10: i32) -> BigRational {
    let p = BigInt::from(10).pow(e10.unsigned_abs());
    if e10 >= 0 {
        BigRational::from_integer(BigInt::from(n) * p)
    } else {
        BigRational::new(BigInt::from(n), p)
    }
}

fn un() -> BigRational {
    BigRational::one()
}

/// Facteur exact depuis un littéral décimal (`0.45359237`).
fn decimal(texte: &str) -> BigRational {
    let (ent, frac) = texte.split_once('.').unwrap_or((texte, ""));
    let chiffres = format!("{ent}{frac}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10).unwrap_or_default();
    BigRational::new(n, BigInt::from(10).pow(frac.len() as u32))
}

/* ------------------------ Registre ------------------------ */

#[derive(Clone, Debug, Default)]
pub struct Registre {
    unites: Vec<Unite>,
    index: HashMap<String, usize>,
}

impl Registre {
    pub fn vide() -> Self {
        Self::default()
    }

    /// Table standard (l’ordre compte : c’est l’ordre de préférence du rendu).
    pub fn standard() -> Self {
        let l = Dimension::LONGUEUR;
        let m = Dimension::MASSE;
        let t = Dimension::TEMPS;
        let sans = Dimension::NULLE;

        let force = Dimension::new([1, 1, -2, 0, 0, 0, 0]);
        let energie = Dimension::new([2, 1, -2, 0, 0, 0, 0]);
        let pression = Dimension::new([-1, 1, -2, 0, 0, 0, 0]);
        let puissance = Dimension::new([2, 1, -3, 0, 0, 0, 0]);
        let frequence = Dimension::new([0, 0, -1, 0, 0, 0, 0]);
        let volume = Dimension::new([3, 0, 0, 0, 0, 0, 0]);

        let mut r = Registre::vide();

        // SI de base
        r.ajoute(Unite::new("m", un(), l).prefixable());
        r.ajoute(Unite::new("kg", un(), m));
        r.ajoute(Unite::new("s", un(), t).prefixable());
        r.ajoute(Unite::new("A", un(), Dimension::COURANT).prefixable());
        r.ajoute(Unite::new("K", un(), Dimension::TEMPERATURE).prefixable());
        r.ajoute(Unite::new("mol", un(), Dimension::QUANTITE).prefixable());
        r.ajoute(Unite::new("cd", un(), Dimension::INTENSITE).prefixable());
        r.ajoute(Unite::new("", un(), sans));

        // longueurs / temps préfixés usuels
        r.ajoute(Unite::new("cm", ratio(1, -2), l));
        r.ajoute(Unite::new("mm", ratio(1, -3), l));
        r.ajoute(Unite::new("km", ratio(1, 3), l));
        r.ajoute(Unite::new("um", ratio(1, -6), l));
        r.ajoute(Unite::new("nm", ratio(1, -9), l));
        r.ajoute(Unite::new("min", ratio(60, 0), t));
        r.ajoute(Unite::new("h", ratio(3600, 0), t));
        r.ajoute(Unite::new("day", ratio(86400, 0), t));

        // dérivées
        r.ajoute(Unite::new("N", un(), force).prefixable());
        r.ajoute(Unite::new("J", un(), energie).prefixable());
        r.ajoute(Unite::new("Pa", un(), pression).prefixable());
        r.ajoute(Unite::new("W", un(), puissance).prefixable());
        r.ajoute(Unite::new("Hz", un(), frequence).prefixable());
        r.ajoute(Unite::new("eV", ratio(1_602_176_634, -28), energie).prefixable());
        r.ajoute(Unite::new("bar", ratio(1, 5), pression));
        r.ajoute(Unite::new("atm", ratio(101_325, 0), pression));

        // impériales
        r.ajoute(Unite::new("in", decimal("0.0254"), l));
        r.ajoute(Unite::new("ft", decimal("0.3048"), l));
        r.ajoute(Unite::new("yd", decimal("0.9144"), l));
        r.ajoute(Unite::new("mi", decimal("1609.344"), l));
        r.ajoute(Unite::new("lb", decimal("0.45359237"), m));
        r.ajoute(Unite::new("oz", decimal("0.028349523125"), m));

        // multiplicatif seulement (pas de décalage d’origine)
        r.ajoute(Unite::new("degC", un(), Dimension::TEMPERATURE));

        // angles
        r.ajoute(Unite::new("rad", un(), sans));
        r.ajoute(Unite::new("deg", decimal(PI_80) / ratio(180, 0), sans));

        r.ajoute(Unite::new("L", ratio(1, -3), volume).prefixable());

        // compléments (en fin : ne change pas les choix du rendu)
        r.ajoute(Unite::new("g", ratio(1, -3), m).prefixable());
        r.ajoute(Unite::new("mg", ratio(1, -6), m));
        r.ajoute(Unite::new("ms", ratio(1, -3), t));
        r.ajoute(Unite::new("%", ratio(1, -2), sans));

        r
    }

    /// Ajoute (ou remplace, à la même place) une unité.
    pub fn ajoute(&mut self, u: Unite) {
        match self.index.get(&u.nom) {
            Some(&i) => self.unites[i] = u,
            None => {
                self.index.insert(u.nom.clone(), self.unites.len());
                self.unites.push(u);
            }
        }
    }

    pub fn cherche(&self, nom: &str) -> Option<&Unite> {
        self.index.get(nom).map(|&i| &self.unites[i])
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Unite> {
        self.unites.iter()
    }

    /// Unités de même dimension, dans l’ordre d’insertion.
    pub fn avec_dimension(&self, dim: Dimension) -> impl Iterator<Item = &Unite> {
        self.unites.iter().filter(move |u| u.dim == dim)
    }

    /// Rapprochement par dimension + facteur approché (tolérance relative).
    pub fn trouve_par_facteur(&self, dim: Dimension, facteur: f64) -> Option<&Unite> {
        self.avec_dimension(dim).find(|u| {
            let f = u.facteur_f64();
            ((facteur - f) / f.abs().max(1.0)).abs() < TOLERANCE_FACTEUR
        })
    }
}

/* ------------------------ Résolution d’un texte ------------------------ */

impl Registre {
    pub fn resout(&self, texte: &str) -> Result<Unite, UnitError> {
        if let Some(u) = self.cherche(texte) {
            return Ok(u.clone());
        }
        if let Some(u) = self.compose(texte) {
            return Ok(u);
        }
        if let Some(u) = self.prefixe(texte) {
            return Ok(u);
        }
        if let Some(u) = self.suffixe(texte) {
            warn!(texte, unite = %u.nom, "unité résolue par suffixe");
            return Ok(u.clone());
        }
        Err(UnitError::UnknownUnit(texte.to_string()))
    }

    /// Nom exact ou préfixe + nom (sans composé).
    fn simple(&self, texte: &str) -> Option<Unite> {
        self.cherche(texte).cloned().or_else(|| self.prefixe(texte))
    }

    /// `kg.m/s/s` : produit sur `.`, quotient sur `/`.
    fn compose(&self, texte: &str) -> Option<Unite> {
        if !texte.contains(['/', '.']) {
            return None;
        }

        let mut facteur = un();
        let mut dim = Dimension::NULLE;
        for (i, groupe) in texte.split('/').enumerate() {
            for nom in groupe.split('.') {
                if nom.is_empty() {
                    return None;
                }
                let u = self.simple(nom)?;
                if i == 0 {
                    facteur *= &u.facteur;
                    dim = dim.produit(u.dim)?;
                } else {
                    facteur /= &u.facteur;
                    dim = dim.quotient(u.dim)?;
                }
            }
        }
        Some(Unite::new(texte, facteur, dim))
    }

    fn prefixe(&self, texte: &str) -> Option<Unite> {
        PREFIXES.iter().find_map(|&(p, e10)| {
            let reste = texte.strip_prefix(p)?;
            let base = self.cherche(reste).filter(|u| u.prefixable)?;
            Some(Unite::new(texte, &base.facteur * ratio(1, e10), base.dim))
        })
    }

    /// Plus long suffixe propre qui soit un nom exact.
    fn suffixe(&self, texte: &str) -> Option<&Unite> {
        texte
            .char_indices()
            .skip(1)
            .find_map(|(i, _)| self.cherche(&texte[i..]))
    }
}
