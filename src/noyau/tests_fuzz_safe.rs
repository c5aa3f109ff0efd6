//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - on accepte certaines erreurs attendues (dimensions incompatibles, division par zéro, etc.)
//! - invariants clés : jamais de panique, approximation seulement si l’expression contient `^`

use std::time::{Duration, Instant};

use super::config::EvalConfig;
use super::erreur::{EvalError, UnitError};
use super::eval::{eval_expression, Resultat};
use super::unites::Registre;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn is_erreur_attendue(e: &EvalError) -> bool {
    // Liste blanche : erreurs *normales* pour des expressions bien formées
    // mais physiquement ou arithmétiquement absurdes.
    matches!(
        e,
        EvalError::DimensionMismatch { .. }
            | EvalError::Arithmetic(_)
            | EvalError::Unit(UnitError::UnknownTargetUnit)
    )
}

fn evalue(expr: &str) -> Result<Resultat, EvalError> {
    eval_expression(expr, &Registre::standard(), &EvalConfig::default()).map(|(r, _d)| r)
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

const UNITES: [&str; 16] = [
    "m", "cm", "km", "kg", "g", "s", "min", "h", "N", "J", "W", "Pa", "ft", "lb", "L", "km/h",
];

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(4) {
        0 => rng.pick(10).to_string(),
        1 => format!("{}.{}", rng.pick(100), rng.pick(1000)),
        2 => format!("{}e{}", 1 + rng.pick(9), rng.pick(7)),
        // gros entier contrôlé
        _ => "9".repeat(20 + rng.pick(20) as usize),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(5) {
        0 | 1 => gen_nombre(rng),
        2 | 3 => format!("{} {}", gen_nombre(rng), rng.choose(&UNITES)),
        _ => rng.choose(&UNITES).to_string(),
    }
}

fn gen_exposant(rng: &mut Rng) -> &'static str {
    rng.choose(&["0", "1", "2", "3", "-1", "-2", "0.5", "9999", "100000000000000000000"])
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(8) {
        0 => gen_atom(rng),
        1 => format!(
            "({}+{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        2 => format!(
            "({}-{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        3 | 4 => format!(
            "({}*{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        5 => format!(
            "({}/{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        6 => format!("-({})", gen_expr(rng, depth - 1)),
        _ => format!("({})^{}", gen_expr(rng, depth - 1), gen_exposant(rng)),
    }
}

/// Expression complète : parfois terminée par une conversion.
fn gen_ligne(rng: &mut Rng) -> String {
    let e = gen_expr(rng, 4);
    if rng.pick(4) == 0 {
        format!("{e} to {}", rng.choose(&UNITES))
    } else {
        e
    }
}

fn verifie(expr: &str, r: &Result<Resultat, EvalError>) {
    match r {
        Ok(res) => {
            assert!(!res.texte.trim().is_empty(), "rendu vide: expr={expr:?}");
            if res.approximatif {
                assert!(expr.contains('^'), "approximation sans ^: expr={expr:?}");
            }
        }
        Err(e) => {
            assert!(
                is_erreur_attendue(e),
                "erreur non attendue: expr={expr:?} err={e}"
            );
        }
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_invariants() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut premier_passage = Vec::new();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_ligne(&mut rng);
        let r = evalue(&expr);
        verifie(&expr, &r);
        if r.is_ok() {
            seen_ok += 1;
        } else {
            seen_err += 1;
        }
        premier_passage.push((expr, r));
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);
    for (expr, r) in &premier_passage {
        budget(t0, max);
        let expr2 = gen_ligne(&mut rng);
        assert_eq!(&expr2, expr);
        assert_eq!(&evalue(&expr2), r, "expr={expr:?}");
    }
}

#[test]
fn fuzz_safe_conversions_meme_dimension() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let familles: [&[&str]; 3] = [
        &["m", "cm", "mm", "km", "in", "ft", "yd", "mi"],
        &["kg", "g", "lb", "oz"],
        &["s", "min", "h", "day"],
    ];
    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..80 {
        budget(t0, max);

        let famille = familles[rng.pick(3) as usize];
        let (u1, u2) = (rng.choose(famille), rng.choose(famille));
        let expr = format!("{} {u1} to {u2}", gen_nombre(&mut rng));

        let r = evalue(&expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
        assert!(r.texte.ends_with(&format!(" {u2}")), "expr={expr:?} -> {}", r.texte);

        // dimensions croisées : toujours refusé
        let autre = familles[(rng.pick(2) as usize + 1 + familles.iter().position(|f| *f == famille).unwrap_or(0)) % 3];
        let croise = format!("1 {u1} to {}", rng.choose(autre));
        assert_eq!(evalue(&croise), Err(EvalError::dimension_mismatch("to")), "expr={croise:?}");
    }
}

#[test]
fn fuzz_safe_operateurs_inconnus_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0x5EED_u64);
    let bruit = ["#", "$", "=", "(", ")", "^", "to", "!", ",", ".."];

    for _ in 0..200 {
        budget(t0, max);

        let mut expr = gen_expr(&mut rng, 2);
        // insertion de bruit : on n’exige qu’une sortie propre (Ok ou Err), jamais de panique
        let pos = rng.pick(expr.len() as u32 + 1) as usize;
        if expr.is_char_boundary(pos) {
            expr.insert_str(pos, rng.choose(&bruit));
        }
        if rng.coin() {
            expr.push_str(rng.choose(&bruit));
        }
        let _ = evalue(&expr);
    }
}
