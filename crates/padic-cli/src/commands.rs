//! Command implementations. Each returns the text printed on stdout.

use crate::config::CliConfig;
use anyhow::{Context, Result};
use padic_math::format::digits_to_string;
use padic_math::{
    difference, negate, padic_distance, product, sum, Digit, Literal, PAdic, Solver,
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
}

/// Parse a command line literal in the configured base.
pub fn parse_number(config: &CliConfig, text: &str) -> Result<PAdic> {
    let literal = Literal::parse(text, Some(config.display.base))
        .with_context(|| format!("invalid literal {:?}", text))?;
    Ok(literal.to_padic_with_config(&config.engine)?)
}

fn render(config: &CliConfig, number: &PAdic) -> Result<String> {
    Ok(number.render(config.display.digits, config.render_options())?)
}

pub fn show(config: &CliConfig, text: &str) -> Result<String> {
    let number = parse_number(config, text)?;
    Ok(format!(
        "{}\nvaluation: {}",
        render(config, &number)?,
        number.valuation()
    ))
}

pub fn binary(config: &CliConfig, op: BinaryOp, lhs: &str, rhs: &str) -> Result<String> {
    let a = parse_number(config, lhs)?;
    let b = parse_number(config, rhs)?;
    let result = match op {
        BinaryOp::Add => sum(&a, &b),
        BinaryOp::Sub => difference(&a, &b),
        BinaryOp::Mul => product(&a, &b),
    }?;
    render(config, &result)
}

pub fn negation(config: &CliConfig, text: &str) -> Result<String> {
    let number = parse_number(config, text)?;
    render(config, &negate(&number))
}

pub fn distance(config: &CliConfig, lhs: &str, rhs: &str) -> Result<String> {
    let a = parse_number(config, lhs)?;
    let b = parse_number(config, rhs)?;
    let diff = difference(&a, &b)?;
    Ok(format!(
        "valuation: {}\ndistance: {}",
        diff.valuation(),
        padic_distance(&a, &b)?
    ))
}

/// Re-express a finite literal in another base.
pub fn convert(config: &CliConfig, text: &str, to: u32) -> Result<String> {
    let literal = Literal::parse(text, Some(config.display.base))
        .with_context(|| format!("invalid literal {:?}", text))?;
    let converted = literal.convert_base(to, config.engine.max_fractional_digits)?;
    Ok(converted.to_string())
}

/// Digit prefixes, most significant first, one per line.
fn format_solutions(base: u32, solutions: &[Vec<Digit>]) -> Result<String> {
    if solutions.is_empty() {
        return Ok("no solutions".to_string());
    }
    let lines = solutions
        .iter()
        .map(|digits| Ok(format!("...{}", digits_to_string(digits.iter().rev().copied(), base)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

fn run_solver(mut solver: Solver, depth: usize) -> Result<String> {
    solver.compute_digits(depth)?;
    info!(
        base = solver.base(),
        depth,
        solutions = solver.possible_solutions().len(),
        "Solver finished"
    );
    format_solutions(solver.base(), solver.possible_solutions())
}

/// Digit expansions of `x` with `a * x = b`.
pub fn solve_linear(config: &CliConfig, a: &str, b: &str, depth: usize) -> Result<String> {
    let a = parse_number(config, a)?;
    let b = parse_number(config, b)?;
    let base = a.base();
    let solver = Solver::with_config(
        base,
        move |x| difference(&product(&a, x)?, &b),
        config.solver,
        config.engine,
    )?;
    run_solver(solver, depth)
}

/// Digit expansions of `x` with `x * x = a`.
pub fn sqrt(config: &CliConfig, a: &str, depth: usize) -> Result<String> {
    let a = parse_number(config, a)?;
    let base = a.base();
    let solver = Solver::with_config(
        base,
        move |x| difference(&product(x, x)?, &a),
        config.solver,
        config.engine,
    )?;
    run_solver(solver, depth)
}
