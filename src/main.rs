// src/main.rs
//
// Calculatrice à unités : point d’entrée en ligne de commande
// -----------------------------------------------------------
// - expression en argument, sinon une ligne lue sur stdin
// - résultat sur stdout ; erreur de syntaxe sur stderr ; code 1 en cas d’échec
// - `--tour` : mise en forme d’une tour d’exposants au lieu d’une évaluation

use std::io::BufRead;
use std::process::ExitCode;

use clap::Parser;

mod journal;
mod noyau;

use noyau::{eval_expression, formate_tour, EvalConfig, EvalError, Registre};

#[derive(Parser)]
#[command(
    name = "calculatrice_unites",
    version,
    about = "Calculatrice à unités : entiers exacts, flottants multiprécision"
)]
struct Cli {
    /// Expression à évaluer (sinon lue sur l’entrée standard)
    expression: Option<String>,

    /// Rendu en unités SI composées (`kg*m/s^2` plutôt que `N`)
    #[arg(long, env = "CALC_SI")]
    si: bool,

    /// Nombre de chiffres estimés au-delà duquel `^` rend une approximation
    #[arg(long, env = "CALC_MAX_DIGITS", default_value_t = noyau::config::MAX_CHIFFRES_DEFAUT)]
    max_digits: f64,

    /// Plus grand exposant entier calculé exactement
    #[arg(long, env = "CALC_EXACT_CAP", default_value_t = noyau::config::PLAFOND_EXPOSANT_EXACT)]
    exact_cap: u64,

    /// Précision des flottants, en bits
    #[arg(long, env = "CALC_PRECISION", default_value_t = noyau::config::PRECISION_DEFAUT)]
    precision: u32,

    /// Met en forme une tour `a^b^c` au lieu d’évaluer
    #[arg(long)]
    tour: bool,

    /// Affiche jetons et RPN sur stderr
    #[arg(long)]
    demarche: bool,
}

impl Cli {
    fn config(&self) -> EvalConfig {
        EvalConfig {
            max_chiffres: self.max_digits,
            plafond_exposant_exact: self.exact_cap,
            prefere_si: self.si,
            ..EvalConfig::default()
        }
        .avec_precision(self.precision)
    }
}

fn lire_ligne() -> std::io::Result<String> {
    let mut ligne = String::new();
    std::io::stdin().lock().read_line(&mut ligne)?;
    Ok(ligne.trim_end_matches(['\r', '\n']).to_string())
}

fn main() -> ExitCode {
    journal::init_journal();
    let cli = Cli::parse();

    let expr = match &cli.expression {
        Some(e) => e.clone(),
        None => match lire_ligne() {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    if cli.tour {
        println!("{}", formate_tour(&expr));
        return ExitCode::SUCCESS;
    }

    let registre = Registre::standard();
    match eval_expression(&expr, &registre, &cli.config()) {
        Ok((r, d)) => {
            if cli.demarche {
                eprintln!("jetons : {}", d.jetons);
                eprintln!("rpn    : {}", d.rpn);
            }
            if r.approximatif {
                println!("warning: Floating point overflow");
                println!("{} ≈ {}", expr.trim(), r.texte);
            } else {
                println!("{}", r.texte);
            }
            ExitCode::SUCCESS
        }
        Err(EvalError::Parse(e)) => {
            eprintln!("Parse error: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
