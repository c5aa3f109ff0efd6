// src/noyau/valeur.rs
//
// Valeur numérique : entier exact OU flottant multiprécision, + dimension.
// -----------------------------------------------------------------------
// Invariants :
// - littéral sans unité ni `.`/`e` => Entier ; sinon => Flottant
// - un Flottant ne redevient jamais Entier (même de valeur entière)
// - la grandeur est toujours en unités SI de base ; seule la dimension
//   de l’unité d’origine est conservée, jamais son nom

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use rug::Float;

use super::dimension::Dimension;
use super::erreur::{ArithmeticError, EvalError};
use super::flottant::{self, log10_biguint};
use super::unites::Unite;

#[derive(Clone, Debug)]
pub enum Nombre {
    Entier(BigInt),
    Flottant(Float),
}

#[derive(Clone, Debug)]
pub struct Valeur {
    pub nombre: Nombre,
    pub dim: Dimension,
}

impl Valeur {
    pub fn entier(n: BigInt) -> Self {
        Valeur {
            nombre: Nombre::Entier(n),
            dim: Dimension::NULLE,
        }
    }

    pub fn flottant(f: Float, dim: Dimension) -> Self {
        Valeur {
            nombre: Nombre::Flottant(f),
            dim,
        }
    }

    /// Décode un littéral numérique et son unité attachée (déjà résolue).
    pub fn depuis_litteral(
        texte: &str,
        unite: Option<&Unite>,
        precision: u32,
    ) -> Result<Self, EvalError> {
        let invalide = || EvalError::InvalidNumber(texte.to_string());
        let look_float = texte.contains(['.', 'e', 'E']);

        let Some(u) = unite else {
            if !look_float {
                let n = BigInt::parse_bytes(texte.as_bytes(), 10).ok_or_else(invalide)?;
                return Ok(Valeur::entier(n));
            }
            let f = flottant::depuis_decimal(texte, precision).ok_or_else(invalide)?;
            return Ok(Valeur::flottant(f, Dimension::NULLE));
        };

        // avec unité : toujours flottant, normalisé en SI
        let f = flottant::depuis_decimal(texte, precision).ok_or_else(invalide)?;
        let si = Float::with_val(precision, &f * &u.facteur_flottant(precision));
        Ok(Valeur::flottant(si, u.dim))
    }

    pub fn est_entier_exact(&self) -> bool {
        matches!(self.nombre, Nombre::Entier(_))
    }

    pub fn est_zero(&self) -> bool {
        match &self.nombre {
            Nombre::Entier(n) => n.is_zero(),
            Nombre::Flottant(f) => f.is_zero(),
        }
    }

    pub fn est_negatif(&self) -> bool {
        match &self.nombre {
            Nombre::Entier(n) => n.is_negative(),
            Nombre::Flottant(f) => flottant::est_negatif(f),
        }
    }

    /// Vue flottante ; un entier est converti sans perte.
    pub fn vers_flottant(&self, precision: u32) -> Float {
        match &self.nombre {
            Nombre::Entier(n) => flottant::depuis_entier(n, precision),
            Nombre::Flottant(f) => f.clone(),
        }
    }

    pub fn vers_f64(&self) -> f64 {
        match &self.nombre {
            Nombre::Entier(n) => n.to_f64().unwrap_or(if n.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }),
            Nombre::Flottant(f) => f.to_f64(),
        }
    }

    /// log10(|v|) sans jamais matérialiser de texte décimal.
    pub fn log10_abs(&self) -> f64 {
        match &self.nombre {
            Nombre::Entier(n) => log10_biguint(n.magnitude()),
            Nombre::Flottant(f) => flottant::log10_abs(f),
        }
    }

    /// Entier porté par la valeur : exact, ou flottant de valeur entière.
    pub fn valeur_entiere(&self) -> Option<BigInt> {
        match &self.nombre {
            Nombre::Entier(n) => Some(n.clone()),
            Nombre::Flottant(f) => flottant::vers_entier(f),
        }
    }
}

/* ------------------------ Arithmétique dimensionnée ------------------------ */

impl Valeur {
    pub fn oppose(&self) -> Valeur {
        let nombre = match &self.nombre {
            Nombre::Entier(n) => Nombre::Entier(-n),
            Nombre::Flottant(f) => Nombre::Flottant(-f.clone()),
        };
        Valeur {
            nombre,
            dim: self.dim,
        }
    }

    /// `+` et `-` : même dimension exigée ; résultat toujours flottant.
    fn somme(&self, o: &Valeur, op: &str, precision: u32) -> Result<Valeur, EvalError> {
        if self.dim != o.dim {
            return Err(EvalError::dimension_mismatch(op));
        }
        let soustraction = op == "-";

        // deux entiers : somme exacte, portée par un flottant assez large
        if let (Nombre::Entier(a), Nombre::Entier(b)) = (&self.nombre, &o.nombre) {
            let s = if soustraction { a - b } else { a + b };
            return Ok(Valeur::flottant(
                flottant::depuis_entier(&s, precision),
                self.dim,
            ));
        }

        let a = self.vers_flottant(precision);
        let b = o.vers_flottant(precision);
        let p = a.prec().max(b.prec());
        let r = if soustraction {
            Float::with_val(p, &a - &b)
        } else {
            Float::with_val(p, &a + &b)
        };
        Ok(Valeur::flottant(r, self.dim))
    }

    pub fn additionne(&self, o: &Valeur, precision: u32) -> Result<Valeur, EvalError> {
        self.somme(o, "+", precision)
    }

    pub fn soustrait(&self, o: &Valeur, precision: u32) -> Result<Valeur, EvalError> {
        self.somme(o, "-", precision)
    }

    /// Reste exact seulement si les deux sont entiers ET le produit sans dimension.
    pub fn multiplie(&self, o: &Valeur, precision: u32) -> Result<Valeur, EvalError> {
        let dim = self
            .dim
            .produit(o.dim)
            .ok_or(ArithmeticError::DimensionOverflow)?;
        if let (Nombre::Entier(a), Nombre::Entier(b)) = (&self.nombre, &o.nombre) {
            if dim.est_nulle() {
                return Ok(Valeur {
                    nombre: Nombre::Entier(a * b),
                    dim,
                });
            }
        }
        let a = self.vers_flottant(precision);
        let b = o.vers_flottant(precision);
        let r = Float::with_val(a.prec().max(b.prec()), &a * &b);
        Ok(Valeur::flottant(r, dim))
    }

    /// Toujours flottant ; diviseur exactement nul => DivisionByZero.
    pub fn divise(&self, o: &Valeur, precision: u32) -> Result<Valeur, EvalError> {
        if o.est_zero() {
            return Err(ArithmeticError::DivisionByZero.into());
        }
        let dim = self
            .dim
            .quotient(o.dim)
            .ok_or(ArithmeticError::DimensionOverflow)?;
        let a = self.vers_flottant(precision);
        let b = o.vers_flottant(precision);
        let r = Float::with_val(precision.max(b.prec()), &a / &b);
        Ok(Valeur::flottant(r, dim))
    }
}
