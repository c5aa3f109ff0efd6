//! Noyau : évaluation (pipeline réel)
//!
//! tokenize -> RPN -> pile de valeurs dimensionnées -> rendu
//!
//! Chaque case de pile possède sa valeur : un `pop` la rend à l’appelant, une
//! erreur abandonne la pile entière (rien à libérer à la main).
//! `^` peut court-circuiter en approximation (succès approché, pas une erreur),
//! `to` est terminal et formate lui-même son résultat.

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};
use rug::Float;
use tracing::{debug, trace};

use super::config::{EvalConfig, DECIMALES_CONVERSION};
use super::erreur::{ArithmeticError, EvalError, ParseError, UnitError};
use super::flottant;
use super::format::format_valeur;
use super::jetons::{format_tokens, tokenize, Tok};
use super::lecture::{approx_depuis_log10, en_fixe};
use super::rpn::to_rpn;
use super::unites::{Registre, Unite};
use super::valeur::{Nombre, Valeur};

/// Exposant à plus de 18 chiffres : jamais matérialisé.
const LOG10_EXPOSANT_GEANT: f64 = 18.0;

#[derive(Default, Clone, Debug)]
pub struct Demarche {
    pub jetons: String,
    pub rpn: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resultat {
    pub texte: String,
    /// Débordement : `texte` est une notation scientifique approchée.
    pub approximatif: bool,
}

impl Resultat {
    fn exact(texte: String) -> Self {
        Resultat {
            texte,
            approximatif: false,
        }
    }

    fn approche(texte: String) -> Self {
        Resultat {
            texte,
            approximatif: true,
        }
    }
}

/// Case de pile : la valeur, et l’unité si c’est une référence nue (`m`, `km/h`).
/// L’unité sert uniquement à `to` ; la valeur, elle, n’en garde que la dimension.
struct Operande {
    valeur: Valeur,
    unite: Option<Unite>,
}

impl From<Valeur> for Operande {
    fn from(valeur: Valeur) -> Self {
        Operande {
            valeur,
            unite: None,
        }
    }
}

/// Jetons + RPN, sans rien évaluer.
pub fn analyse(expr_str: &str) -> Result<(Vec<Tok>, Demarche), ParseError> {
    let jetons = tokenize(expr_str.trim());
    let rpn = to_rpn(&jetons)?;

    let d = Demarche {
        jetons: format_tokens(&jetons),
        rpn: format_tokens(&rpn),
    };
    debug!(jetons = %d.jetons, rpn = %d.rpn, "analyse");
    Ok((rpn, d))
}

/// API publique : évalue une expression et retourne le rendu + la démarche.
pub fn eval_expression(
    expr_str: &str,
    registre: &Registre,
    cfg: &EvalConfig,
) -> Result<(Resultat, Demarche), EvalError> {
    let (rpn, d) = analyse(expr_str)?;
    let r = eval_rpn(&rpn, registre, cfg)?;
    Ok((r, d))
}

fn depile(pile: &mut Vec<Operande>, op: &str) -> Result<Operande, EvalError> {
    pile.pop()
        .ok_or_else(|| EvalError::MissingOperand(op.to_string()))
}

/// Machine à pile sur une RPN.
pub fn eval_rpn(rpn: &[Tok], registre: &Registre, cfg: &EvalConfig) -> Result<Resultat, EvalError> {
    let p = cfg.precision;
    let mut pile: Vec<Operande> = Vec::new();

    for (i, tok) in rpn.iter().enumerate() {
        match tok {
            Tok::Num { litteral, unite } => {
                let u = unite.as_deref().map(|t| registre.resout(t)).transpose()?;
                let v = Valeur::depuis_litteral(litteral, u.as_ref(), p)?;
                pile.push(v.into());
            }

            // référence nue = « 1 unité »
            Tok::Ident(nom) => {
                let u = registre.resout(nom)?;
                let valeur = Valeur::depuis_litteral("1", Some(&u), p)?;
                pile.push(Operande {
                    valeur,
                    unite: Some(u),
                });
            }

            Tok::Neg => {
                let a = depile(&mut pile, "neg")?;
                pile.push(a.valeur.oppose().into());
            }

            Tok::Op(c) => {
                if !matches!(c, '+' | '-' | '*' | '/' | '^') {
                    return Err(EvalError::UnknownOperator(*c));
                }
                let op = c.to_string();
                let b = depile(&mut pile, &op)?.valeur;
                let a = depile(&mut pile, &op)?.valeur;

                let r = match c {
                    '+' => a.additionne(&b, p)?,
                    '-' => a.soustrait(&b, p)?,
                    '*' => a.multiplie(&b, p)?,
                    '/' => a.divise(&b, p)?,
                    _ => match puissance(&a, &b, registre, cfg)? {
                        Puissance::Valeur(v) => v,
                        Puissance::Approchee(texte) => return Ok(Resultat::approche(texte)),
                    },
                };
                pile.push(r.into());
            }

            Tok::To => {
                let cible = depile(&mut pile, "to")?;
                let source = depile(&mut pile, "to")?;
                if !pile.is_empty() || i + 1 != rpn.len() {
                    return Err(EvalError::ConversionNotTerminal);
                }
                return convertit(
                    &source.valeur,
                    &cible.valeur,
                    cible.unite.as_ref(),
                    registre,
                    p,
                )
                .map(Resultat::exact);
            }

            Tok::LPar | Tok::RPar => return Err(EvalError::UnexpectedToken),
        }
    }

    if pile.len() != 1 {
        return Err(EvalError::InvalidExpression(pile.len()));
    }
    let v = depile(&mut pile, "fin")?.valeur;
    debug!(dim = %v.dim, exact = v.est_entier_exact(), "résultat");
    Ok(Resultat::exact(format_valeur(&v, registre, cfg.prefere_si)))
}

/* ------------------------ Conversion `to` ------------------------ */

/// `source to cible` : `<valeur SI / facteur> <nom>` en décimales fixes.
/// `unite` = unité portée par la cible quand c’est une référence nue.
pub fn convertit(
    source: &Valeur,
    cible: &Valeur,
    unite: Option<&Unite>,
    registre: &Registre,
    precision: u32,
) -> Result<String, EvalError> {
    // sans unité portée, on retrouve la cible par son facteur
    let unite = match unite {
        Some(u) => u.clone(),
        None => registre
            .trouve_par_facteur(cible.dim, cible.vers_f64())
            .cloned()
            .ok_or(UnitError::UnknownTargetUnit)?,
    };

    if source.dim != unite.dim {
        return Err(EvalError::dimension_mismatch("to"));
    }

    let si = source.vers_flottant(precision);
    let r = Float::with_val(si.prec(), &si / &unite.facteur_flottant(precision));
    Ok(format!("{} {}", en_fixe(&r, DECIMALES_CONVERSION), unite.nom))
}

/* ------------------------ Puissance ------------------------ */

enum Puissance {
    Valeur(Valeur),
    Approchee(String),
}

fn exposant_impair(expo: &Valeur) -> Option<bool> {
    expo.valeur_entiere().map(|n| n.magnitude().bit(0))
}

fn puissance(
    base: &Valeur,
    expo: &Valeur,
    registre: &Registre,
    cfg: &EvalConfig,
) -> Result<Puissance, EvalError> {
    if !expo.dim.est_nulle() {
        return Err(ArithmeticError::NonUnitlessExponent.into());
    }

    let log_expo = expo.log10_abs();
    if log_expo > LOG10_EXPOSANT_GEANT {
        return puissance_geante(base, expo, registre);
    }

    if !base.est_zero() {
        let estimation = expo.vers_f64() * base.log10_abs();
        if !estimation.is_finite() || estimation > cfg.max_chiffres {
            debug!(estimation, plafond = cfg.max_chiffres, "puissance approchée");
            let negatif = base.est_negatif() && exposant_impair(expo).unwrap_or(false);
            return Ok(Puissance::Approchee(approx_depuis_log10(estimation, negatif)));
        }
    }

    // chemin exact : entier ^ entier naturel sous le plafond
    if let (Nombre::Entier(b), Nombre::Entier(e)) = (&base.nombre, &expo.nombre) {
        if let Some(n) = e.to_u64().filter(|&n| n <= cfg.plafond_exposant_exact) {
            trace!(n, "puissance exacte");
            let n32 = u32::try_from(n).map_err(|_| ArithmeticError::DimensionOverflow)?;
            let dim = base
                .dim
                .puissance(n as i64)
                .ok_or(ArithmeticError::DimensionOverflow)?;
            return Ok(Puissance::Valeur(Valeur {
                nombre: Nombre::Entier(b.pow(n32)),
                dim,
            }));
        }
    }

    trace!("puissance flottante exp(e ln b)");
    puissance_flottante(base, expo, cfg)
}

fn puissance_flottante(
    base: &Valeur,
    expo: &Valeur,
    cfg: &EvalConfig,
) -> Result<Puissance, EvalError> {
    let p = cfg.precision;

    // la dimension ne suit que les exposants entiers exacts
    let dim = match &expo.nombre {
        Nombre::Entier(n) => {
            let n = n.to_i64().ok_or(ArithmeticError::DimensionOverflow)?;
            base.dim
                .puissance(n)
                .ok_or(ArithmeticError::DimensionOverflow)?
        }
        Nombre::Flottant(_) => base.dim,
    };

    if base.est_zero() {
        if expo.est_zero() {
            return Ok(Puissance::Valeur(Valeur::flottant(Float::with_val(p, 1), dim)));
        }
        if expo.est_negatif() {
            return Err(ArithmeticError::DivisionByZero.into());
        }
        return Ok(Puissance::Valeur(Valeur::flottant(Float::new(p), dim)));
    }

    let negatif = if base.est_negatif() {
        exposant_impair(expo).ok_or(ArithmeticError::NegativeBase)?
    } else {
        false
    };

    let ln_b = Float::with_val(p, base.vers_flottant(p).abs()).ln();
    let e = expo.vers_flottant(p);
    let module = Float::with_val(p, &e * &ln_b).exp();
    if !module.is_finite() {
        // hors de la plage de MPFR : on retombe sur l’estimation
        let estimation = expo.vers_f64() * base.log10_abs();
        return Ok(Puissance::Approchee(approx_depuis_log10(estimation, negatif)));
    }

    let r = if negatif { -module } else { module };
    Ok(Puissance::Valeur(Valeur::flottant(r, dim)))
}

/// Exposant géant (> 18 chiffres) : cas triviaux exacts, sinon tour `b^(1E<k>)`.
fn puissance_geante(
    base: &Valeur,
    expo: &Valeur,
    registre: &Registre,
) -> Result<Puissance, EvalError> {
    if !base.dim.est_nulle() {
        return Err(ArithmeticError::DimensionOverflow.into());
    }

    if base.est_zero() {
        if expo.est_negatif() {
            return Err(ArithmeticError::DivisionByZero.into());
        }
        return Ok(Puissance::Valeur(base.clone()));
    }

    match base.valeur_entiere() {
        Some(n) if n.is_one() => return Ok(Puissance::Valeur(base.clone())),
        Some(n) if n == -BigInt::one() => {
            let impair = exposant_impair(expo).ok_or(ArithmeticError::NegativeBase)?;
            let v = if impair { base.clone() } else { base.oppose() };
            return Ok(Puissance::Valeur(v));
        }
        _ => {}
    }

    let chiffres = match &expo.nombre {
        Nombre::Entier(n) => n.magnitude().to_string().len(),
        Nombre::Flottant(f) => (flottant::log10_abs(f) + 1e-9).floor() as usize + 1,
    };
    let signe = if expo.est_negatif() { "-" } else { "" };
    let texte = format!(
        "{}^({signe}1E{})",
        format_valeur(base, registre, false),
        chiffres - 1
    );
    debug!(%texte, "exposant géant");
    Ok(Puissance::Approchee(texte))
}
