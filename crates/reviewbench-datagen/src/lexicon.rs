//! Spanish word lists backing the fake names, emails and prose.

use rand::seq::SliceRandom;
use rand::Rng;

pub const FIRST_NAMES: &[&str] = &[
    "Alejandro", "Ana", "Andrés", "Beatriz", "Carlos", "Carmen", "Diego", "Elena", "Fernando", "Gabriela",
    "Guadalupe", "Héctor", "Isabel", "Javier", "Jimena", "Jorge", "José", "Laura", "Lucía", "Luis",
    "Manuel", "María", "Marta", "Miguel", "Natalia", "Pablo", "Paula", "Rafael", "Raquel", "Ricardo",
    "Rocío", "Sergio", "Sofía", "Teresa", "Valentina", "Ximena",
];

pub const LAST_NAMES: &[&str] = &[
    "Álvarez", "Castillo", "Castro", "Cruz", "Delgado", "Díaz", "Domínguez", "Fernández", "Flores", "García",
    "Gómez", "González", "Guerrero", "Gutiérrez", "Hernández", "Jiménez", "López", "Martín", "Martínez",
    "Medina", "Méndez", "Moreno", "Muñoz", "Navarro", "Ortiz", "Pérez", "Ramírez", "Ramos", "Reyes",
    "Rodríguez", "Romero", "Rubio", "Ruiz", "Sánchez", "Torres", "Vargas", "Vázquez",
];

pub const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com", "hotmail.com", "yahoo.es", "outlook.com", "correo.mx", "telefonica.net", "prodigy.net.mx",
];

/// Filler vocabulary for sentences. Lower-case, no punctuation.
pub const WORDS: &[&str] = &[
    "casa", "tiempo", "calidad", "precio", "envío", "entrega", "material", "diseño", "color", "tamaño",
    "uso", "día", "semana", "mes", "familia", "regalo", "caja", "paquete", "tienda", "marca", "modelo",
    "servicio", "atención", "cliente", "compra", "pedido", "llegó", "funciona", "parece", "tiene", "queda",
    "esperaba", "usamos", "compré", "volvería", "sirve", "dura", "cumple", "muy", "bastante", "poco",
    "demasiado", "siempre", "nunca", "todavía", "después", "antes", "rápido", "lento", "bueno", "malo",
    "bonito", "práctico", "cómodo", "resistente", "frágil", "ligero", "pesado", "sencillo", "útil",
    "normal", "perfecto", "correcto", "aceptable", "excelente", "barato", "caro", "nuevo", "original",
    "para", "con", "sin", "por", "desde", "hasta", "sobre", "entre", "mi", "nuestro", "el", "la", "los",
    "las", "un", "una", "y", "pero", "aunque", "porque", "como", "más", "menos",
];

pub fn name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ana");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("García");
    if rng.gen_bool(0.3) {
        let second = LAST_NAMES.choose(rng).copied().unwrap_or("López");
        format!("{first} {last} {second}")
    } else {
        format!("{first} {last}")
    }
}

/// ASCII-only mailbox derived from a random name.
pub fn email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = ascii_fold(FIRST_NAMES.choose(rng).copied().unwrap_or("ana"));
    let last = ascii_fold(LAST_NAMES.choose(rng).copied().unwrap_or("garcia"));
    let domain = EMAIL_DOMAINS.choose(rng).copied().unwrap_or("example.com");
    match rng.gen_range(0..3) {
        0 => format!("{first}.{last}@{domain}"),
        1 => format!("{first}{}@{domain}", rng.gen_range(1..100)),
        _ => format!("{}{last}@{domain}", first.chars().next().unwrap_or('x')),
    }
}

/// A capitalised sentence of 4 to 10 words ending in a period.
pub fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let n = rng.gen_range(4..=10);
    let words: Vec<&str> = (0..n).map(|_| WORDS.choose(rng).copied().unwrap_or("bueno")).collect();
    let mut s = capitalise(&words.join(" "));
    s.push('.');
    s
}

/// Whole sentences joined by spaces, never longer than `max_chars`
/// characters. Always returns at least one (possibly shortened) sentence.
pub fn text<R: Rng + ?Sized>(rng: &mut R, max_chars: usize) -> String {
    let mut out = String::new();
    loop {
        let next = sentence(rng);
        let sep = usize::from(!out.is_empty());
        if out.chars().count() + sep + next.chars().count() > max_chars {
            break;
        }
        if sep == 1 {
            out.push(' ');
        }
        out.push_str(&next);
    }
    if out.is_empty() {
        let mut short: String = sentence(rng).chars().take(max_chars.saturating_sub(1)).collect();
        short = short.trim_end_matches([' ', '.']).to_string();
        short.push('.');
        out = short;
    }
    out
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn ascii_fold(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn text_respects_max_chars() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let t = text(&mut rng, 200);
            assert!(!t.is_empty());
            assert!(t.chars().count() <= 200, "{} chars: {t}", t.chars().count());
            assert!(t.ends_with('.'));
        }
    }

    #[test]
    fn emails_are_ascii() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let e = email(&mut rng);
            assert!(e.is_ascii(), "{e}");
            assert_eq!(e.matches('@').count(), 1);
        }
    }

    #[test]
    fn sentences_start_upper_case() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = sentence(&mut rng);
        assert!(s.chars().next().is_some_and(char::is_uppercase));
    }
}
