// src/noyau/format.rs
//
// Rendu d’une valeur dimensionnée
// - sans dimension : entier exact en toutes lettres, sinon 12 chiffres significatifs
// - sinon : première unité du registre (ordre d’insertion) de même dimension
//   dont la valeur mise à l’échelle tombe dans [0.1, 1000)
// - à défaut (ou mode SI) : valeur SI + unité composée `m*kg/s^2`
//   (symboles dans l’ordre du vecteur : m kg s A K mol cd)

use rug::Float;

use super::config::{CHIFFRES_SIGNIFICATIFS, PRECISION_DEFAUT};
use super::dimension::{Dimension, SYMBOLES_BASE};
use super::flottant::arrondi_entier;
use super::lecture::en_significatifs;
use super::unites::{Registre, Unite};
use super::valeur::{Nombre, Valeur};

/// Écart à l’entier en dessous duquel un résultat s’affiche sans décimales.
const TOLERANCE_ENTIER: f64 = 1e-12;

/* ------------------------ Unité composée ------------------------ */

fn facteur_base(sym: &str, p: i32) -> String {
    if p > 1 {
        format!("{sym}^{p}")
    } else {
        sym.to_string()
    }
}

/// Numérateur/dénominateur en symboles SI de base ; `1` si numérateur vide.
pub fn unite_composee(dim: Dimension) -> String {
    let mut num = Vec::new();
    let mut den = Vec::new();
    for (sym, &p) in SYMBOLES_BASE.iter().zip(dim.exposants().iter()) {
        if p > 0 {
            num.push(facteur_base(sym, p));
        } else if p < 0 {
            den.push(facteur_base(sym, -p));
        }
    }

    let haut = if num.is_empty() {
        "1".to_string()
    } else {
        num.join("*")
    };
    if den.is_empty() {
        haut
    } else {
        format!("{haut}/{}", den.join("*"))
    }
}

/* ------------------------ Valeurs ------------------------ */

fn nombre_brut(v: &Valeur) -> String {
    match &v.nombre {
        Nombre::Entier(n) => n.to_string(),
        Nombre::Flottant(f) => en_significatifs(f, CHIFFRES_SIGNIFICATIFS),
    }
}

/// Valeur exprimée dans `u`, si elle y est “lisible”.
fn dans_unite(v: &Valeur, u: &Unite) -> Option<String> {
    let si = v.vers_flottant(PRECISION_DEFAUT);
    let p = si.prec();
    let mise_a_echelle = Float::with_val(p, &si / &u.facteur_flottant(p));

    let s = mise_a_echelle.to_f64();
    if !(0.1..1000.0).contains(&s.abs()) {
        return None;
    }
    let nombre = if (s - s.round()).abs() < TOLERANCE_ENTIER {
        arrondi_entier(&mise_a_echelle).to_string()
    } else {
        en_significatifs(&mise_a_echelle, CHIFFRES_SIGNIFICATIFS)
    };
    Some(format!("{nombre} {}", u.nom))
}

pub fn format_valeur(v: &Valeur, registre: &Registre, prefere_si: bool) -> String {
    if v.dim.est_nulle() {
        return nombre_brut(v);
    }

    if !prefere_si {
        if let Some(s) = registre
            .avec_dimension(v.dim)
            .find_map(|u| dans_unite(v, u))
        {
            return s;
        }
    }

    format!("{} {}", nombre_brut(v), unite_composee(v.dim))
}
