use chrono::Local;
use clap::{Parser, ValueEnum};
use fancy_regex::Regex;
use hashbrown::HashMap;
use num_rational::Ratio;
use once_cell::sync::Lazy;
use sparse_poly::{Coefficient, Polynomial, GF};
use std::{
    error::Error,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
    time::Instant,
};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    #[arg(short, long)]
    input: String,

    #[arg(short, long)]
    output: String,

    #[arg(long, value_enum, default_value_t = Op::Gcd)]
    op: Op,

    #[arg(long, value_enum, default_value_t = CoefficientField::Gf)]
    field: CoefficientField,

    /// Points to evaluate at, used by `--op eval`
    #[arg(long, allow_negative_numbers = true)]
    at: Vec<i64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Gcd,
    Div,
    Rem,
    Mul,
    Add,
    Sub,
    Compose,
    Eval,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CoefficientField {
    Gf,
    Rational,
    Real,
}

#[derive(Debug, Error)]
enum ParseError {
    #[error("missing `Defining <var>` line")]
    MissingVariable,

    #[error("missing polynomial list `[p1, p2, ...]`")]
    MissingPolynomials,

    #[error("unexpected line `{0}`")]
    UnexpectedLine(String),

    #[error("unknown variable `{found}`, expected `{expected}`")]
    UnknownVariable { found: String, expected: String },

    #[error("invalid term `{0}`")]
    InvalidTerm(String),

    #[error("coefficient {0} does not fit the coefficient type")]
    Overflow(i128),

    #[error("`{op:?}` needs at least {needed} polynomial(s), got {got}")]
    TooFewOperands { op: Op, needed: usize, got: usize },
}

/// Integer coefficients as written in the input file.
type RawPolynomial = Vec<(usize, i128)>;

trait FromInteger: Coefficient {
    fn from_integer(value: i128) -> Result<Self, ParseError>;
}

impl FromInteger for GF {
    fn from_integer(value: i128) -> Result<Self, ParseError> {
        Ok(GF::from(value))
    }
}

impl FromInteger for Ratio<i64> {
    fn from_integer(value: i128) -> Result<Self, ParseError> {
        i64::try_from(value)
            .map(Ratio::from_integer)
            .map_err(|_| ParseError::Overflow(value))
    }
}

impl FromInteger for f64 {
    fn from_integer(value: i128) -> Result<Self, ParseError> {
        Ok(value as f64)
    }
}

static TERM_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?=[+-])").unwrap());

fn split_polynomial(text: &str) -> Vec<(&str, i128)> {
    let mut result = Vec::new();
    let mut prev_match_end = 0;

    for mat in TERM_SPLIT.find_iter(text).flatten() {
        let part = text[prev_match_end..mat.start()].trim();
        if !part.is_empty() {
            result.push(part);
        }
        prev_match_end = mat.end();
    }

    let remaining_part = text[prev_match_end..].trim();
    if !remaining_part.is_empty() {
        result.push(remaining_part);
    }

    result
        .iter()
        .map(|t| match t.strip_prefix('-') {
            Some(t) => (t.trim(), -1),
            None => (t.strip_prefix('+').unwrap_or(t).trim(), 1),
        })
        .collect()
}

/// Parses one monomial like `5*x^2`, `x`, or `7` into `(degree, coeff)`.
fn parse_term(term: &str, sign: i128, var: &str) -> Result<(usize, i128), ParseError> {
    let invalid = || ParseError::InvalidTerm(term.to_owned());
    let parts: Vec<&str> = term.split('*').map(|s| s.trim()).collect();
    let (coeff_part, var_parts) = match parts[0].chars().next() {
        Some(c) if c.is_ascii_digit() => (parts[0], &parts[1..]),
        Some(_) => ("1", &parts[..]),
        None => return Err(invalid()),
    };
    let coeff = coeff_part.parse::<i128>().map_err(|_| invalid())?;

    let mut degree: usize = 0;
    for part in var_parts {
        let mut split = part.split('^');
        let (name, power) = match (split.next(), split.next(), split.next()) {
            (Some(name), None, None) => (name.trim(), 1),
            (Some(name), Some(power), None) => {
                (name.trim(), power.trim().parse::<usize>().map_err(|_| invalid())?)
            },
            _ => return Err(invalid()),
        };
        if name != var {
            return Err(ParseError::UnknownVariable {
                found: name.to_owned(),
                expected: var.to_owned(),
            });
        }
        degree = degree
            .checked_add(power)
            .filter(|&d| i64::try_from(d).is_ok())
            .ok_or_else(invalid)?;
    }

    Ok((degree, coeff * sign))
}

fn parse_polynomial(text: &str, var: &str) -> Result<RawPolynomial, ParseError> {
    let mut terms: HashMap<usize, i128> = HashMap::new();
    for (term, sign) in split_polynomial(text) {
        let (degree, coeff) = parse_term(term, sign, var)?;
        *terms.entry(degree).or_insert(0) += coeff;
    }
    let mut terms: RawPolynomial = terms.into_iter().filter(|(_, c)| *c != 0).collect();
    terms.sort_unstable();
    Ok(terms)
}

fn parse_var<R: BufRead>(reader: &mut R) -> Result<String, Box<dyn Error>> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if let Some(var) = line.strip_prefix("Defining") {
            let var = var.trim();
            if var.is_empty() {
                break;
            }
            return Ok(var.to_owned());
        }
    }

    Err(ParseError::MissingVariable.into())
}

fn parse_polynomials<R: BufRead>(
    reader: &mut R,
    var: &str,
) -> Result<Vec<RawPolynomial>, Box<dyn Error>> {
    let mut polynomials = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if let Some(list) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            polynomials = Some(
                list.split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|poly| parse_polynomial(poly, var))
                    .collect::<Result<Vec<_>, _>>()?,
            );
            continue;
        }

        if !line.is_empty() {
            return Err(ParseError::UnexpectedLine(line.to_owned()).into());
        }
    }

    polynomials.ok_or_else(|| ParseError::MissingPolynomials.into())
}

fn to_polynomial<T: FromInteger>(raw: &RawPolynomial) -> Result<Polynomial<T>, ParseError> {
    let terms = raw
        .iter()
        .map(|&(degree, coeff)| T::from_integer(coeff).map(|c| (degree, c)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polynomial::from_terms(&terms))
}

fn render<T: Coefficient>(poly: &Polynomial<T>, var: &str) -> String {
    let text = poly.to_string();
    if var == "x" {
        text
    } else {
        text.replace('x', var)
    }
}

fn operands<T>(op: Op, polys: &[T], needed: usize) -> Result<&[T], ParseError> {
    if polys.len() < needed {
        return Err(ParseError::TooFewOperands {
            op,
            needed,
            got: polys.len(),
        });
    }
    Ok(&polys[..needed])
}

fn run<T: FromInteger>(
    op: Op,
    polys: &[Polynomial<T>],
    at: &[T],
    var: &str,
) -> Result<Vec<String>, Box<dyn Error>> {
    let result = match op {
        Op::Gcd => {
            operands(op, polys, 1)?;
            Polynomial::gcd_all(polys)
        },
        Op::Eval => {
            let f = &operands(op, polys, 1)?[0];
            return Ok(at
                .iter()
                .zip(f.evaluate_many(at))
                .map(|(x, y)| format!("{}({}) = {}", var, x, y))
                .collect());
        },
        _ => {
            let (f, g) = match operands(op, polys, 2)? {
                [f, g] => (f, g),
                _ => unreachable!(),
            };
            match op {
                Op::Div => (f / g)?,
                Op::Rem => (f % g)?,
                Op::Mul => f * g,
                Op::Add => f + g,
                Op::Sub => f - g,
                Op::Compose => f & g,
                Op::Gcd | Op::Eval => unreachable!(),
            }
        },
    };

    Ok(vec![render(&result, var)])
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let path = Path::new(&args.input);
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let var = parse_var(&mut reader)?;
    let polynomials = parse_polynomials(&mut reader, &var)?;

    match args.field {
        CoefficientField::Gf => main_inner::<GF>(&args, &var, &polynomials)?,
        CoefficientField::Rational => main_inner::<Ratio<i64>>(&args, &var, &polynomials)?,
        CoefficientField::Real => main_inner::<f64>(&args, &var, &polynomials)?,
    }

    Ok(())
}

fn main_inner<T: FromInteger>(
    args: &Args,
    var: &str,
    polynomials: &[RawPolynomial],
) -> Result<(), Box<dyn Error>> {
    let polys = polynomials
        .iter()
        .map(to_polynomial::<T>)
        .collect::<Result<Vec<_>, _>>()?;
    let at = args
        .at
        .iter()
        .map(|&v| T::from_integer(v as i128))
        .collect::<Result<Vec<_>, _>>()?;

    println!(
        "{} Computation start: {:?} over {:?} with {} polynomial(s)",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        args.op,
        args.field,
        polys.len()
    );
    let start_time = Instant::now();

    let lines = run(args.op, &polys, &at, var)?;

    let elapsed_secs = start_time.elapsed().as_secs_f64();
    println!(
        "{} Computation end, total time {:.3} seconds",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        elapsed_secs
    );

    let mut output = File::create(Path::new(&args.output))?;
    output.write_all(lines.join("\n").as_bytes())?;
    output.write_all(b"\n")?;
    output.flush()?;

    Ok(())
}
