// src/noyau/tour.rs
//
// Tours d’exposants `a^b^c` -> `a^(b^(c))`, avec raccourcis :
// - 1 suivi de k zéros => 1E<k>
// - k chiffres 9       => 1E<k>
// Un opérande ordinaire est recopié tel quel (zéros de tête compris).

fn raccourci(operande: &str) -> String {
    let sans_zeros = operande.trim_start_matches('0');
    if sans_zeros.is_empty() {
        return "0".to_string();
    }

    if let Some(zeros) = sans_zeros.strip_prefix('1') {
        if zeros.bytes().all(|b| b == b'0') {
            return format!("1E{}", zeros.len());
        }
    }
    if sans_zeros.bytes().all(|b| b == b'9') {
        return format!("1E{}", sans_zeros.len());
    }
    operande.to_string()
}

/// Réécrit une ligne `a^b^...` (sans espaces) en tour imbriquée à droite.
pub fn formate_tour(ligne: &str) -> String {
    let operandes: Vec<String> = ligne.trim_end().split('^').map(raccourci).collect();

    let mut rendu = String::new();
    for (i, op) in operandes.iter().rev().enumerate() {
        rendu = if i == 0 {
            op.clone()
        } else {
            format!("{op}^({rendu})")
        };
    }
    rendu
}
