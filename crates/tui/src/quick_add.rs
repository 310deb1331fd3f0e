//! One-line quick-add syntax: `[quantity] [unit] name [#category]`.
//!
//! `2 kg Tomates #verduras`, `Pan Frances`, `0,5 l Leche`.

use engine::{Category, NewItem, Unit};

pub fn parse(input: &str) -> Result<NewItem, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Escribe un producto.".to_string());
    }

    let (category, rest) = parse_tag(trimmed)?;
    let mut tokens: Vec<&str> = rest.split_whitespace().collect();

    let mut quantity = 1.0;
    if let Some(first) = tokens.first()
        && let Some(value) = parse_quantity(first)
    {
        quantity = value?;
        tokens.remove(0);
    }

    let mut unit = Unit::Piece;
    if tokens.len() > 1
        && let Some(parsed) = parse_unit(tokens[0])
    {
        unit = parsed;
        tokens.remove(0);
    }

    let name = tokens.join(" ");
    if name.is_empty() {
        return Err("Falta el nombre del producto.".to_string());
    }

    Ok(NewItem {
        name,
        category: category.unwrap_or(Category::Other),
        quantity,
        unit,
    })
}

/// `None` when the token is not numeric at all, so it is read as part of the name.
fn parse_quantity(token: &str) -> Option<Result<f64, String>> {
    if !token.starts_with(|ch: char| ch.is_ascii_digit()) {
        return None;
    }
    let value = token.replace(',', ".").parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return Some(Err("Cantidad no válida.".to_string()));
    }
    Some(Ok(value))
}

fn parse_unit(token: &str) -> Option<Unit> {
    match token.to_lowercase().as_str() {
        "u" | "un" | "unidad" | "unidades" => Some(Unit::Piece),
        "kg" => Some(Unit::Kilogram),
        "g" | "gr" => Some(Unit::Gram),
        "lb" | "libra" | "libras" => Some(Unit::Pound),
        "l" | "lt" | "litro" | "litros" => Some(Unit::Liter),
        "ml" => Some(Unit::Milliliter),
        _ => None,
    }
}

/// Pulls a single `#tag` out of the text and matches it against the
/// category labels, ignoring the emoji and case.
fn parse_tag(text: &str) -> Result<(Option<Category>, String), String> {
    let mut tag: Option<Category> = None;
    let mut kept: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        if let Some(rest) = token.strip_prefix('#') {
            if rest.is_empty() {
                kept.push(token);
                continue;
            }
            if tag.is_some() {
                return Err("Demasiadas categorías: máximo 1.".to_string());
            }
            tag = Some(category_for_tag(rest)?);
        } else {
            kept.push(token);
        }
    }

    Ok((tag, kept.join(" ")))
}

fn category_for_tag(tag: &str) -> Result<Category, String> {
    let tag = tag.to_lowercase();
    Category::ALL
        .into_iter()
        .find(|category| {
            category
                .label()
                .split_whitespace()
                .last()
                .is_some_and(|word| word.to_lowercase().starts_with(&tag))
        })
        .ok_or_else(|| format!("Categoría desconocida: #{tag}"))
}
