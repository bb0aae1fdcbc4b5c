use std::io::{self, Write};
use displaydoc::Display;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use thiserror::Error;
use crate::disjoint_set::DisjointSet;
use crate::error::DisjointSetError;
use crate::naive::NaiveDisjointSet;

/// Upper bound on `random.iterations`; each iteration yields up to five operations.
pub const MAX_RANDOM_ITERATIONS: usize = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Op {
    /// merge {0} {1}
    Merge(usize, usize),
    /// same {0} {1}
    Same(usize, usize),
    /// size {0}
    Size(usize),
    /// count
    Count,
    /// check
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    /// {0}
    Bool(bool),
    /// {0}
    Number(usize),
    /// ok
    Checked,
}

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("Failed to parse workload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Field `{0}` is missing or has the wrong type")]
    BadField(&'static str),

    #[error("Both `ops` and `random` are given; pick one")]
    OpsAndRandom,

    #[error("Operation #{step} is malformed: {reason}")]
    BadOp { step: usize, reason: String },

    #[error("While setting up the forest: {0}")]
    DisjointSet(#[from] DisjointSetError),

    #[error("Step {step} (`{op}`): {source}")]
    Replay {
        step: usize,
        op: Op,
        source: DisjointSetError,
    },

    #[error("Step {step} (`{op}`): forest says {actual}, reference says {expected}")]
    Mismatch {
        step: usize,
        op: Op,
        expected: Outcome,
        actual: Outcome,
    },
}

/// A sequence of operations over a fixed universe, either read from JSON or generated randomly.
#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    pub num_elems: i64,
    pub ops: Vec<Op>,
    /// Replay against `NaiveDisjointSet` as well and stop at the first disagreement.
    pub verify: bool,
}

impl Workload {
    pub fn from_json(text: &str) -> Result<Workload, WorkloadError> {
        let value: Value = serde_json::from_str(text)?;
        Workload::from_value(&value)
    }

    /// Reads `num_elems`, `verify`, and either `ops` or the `random` generator settings.
    pub fn from_value(value: &Value) -> Result<Workload, WorkloadError> {
        let num_elems = value["num_elems"].as_i64().ok_or(WorkloadError::BadField("num_elems"))?;
        let verify = optional(value, "verify", false, Value::as_bool)?;

        if !value["ops"].is_null() && !value["random"].is_null() {
            return Err(WorkloadError::OpsAndRandom);
        }

        match &value["ops"] {
            Value::Array(ops) => {
                let ops = ops.iter()
                    .enumerate()
                    .map(|(step, op)| parse_op(step, op))
                    .collect::<Result<Vec<Op>, _>>()?;
                Ok(Workload { num_elems, ops, verify })
            }
            Value::Null => {
                let random = &value["random"];
                let seed = optional(random, "seed", 0, Value::as_u64)?;
                let iterations = optional(random, "iterations", 1000, |v| {
                    v.as_u64()
                        .and_then(|x| usize::try_from(x).ok())
                        .filter(|&x| x <= MAX_RANDOM_ITERATIONS)
                })?;
                let merge_probability = optional(random, "merge_probability", 0.1, |v| {
                    v.as_f64().filter(|p| (0.0..=1.0).contains(p))
                })?;
                let len = usize::try_from(num_elems)
                    .map_err(|_| DisjointSetError::InvalidArgument { requested: num_elems })?;

                let mut rng = StdRng::seed_from_u64(seed);
                let mut workload = Workload::random(&mut rng, len, iterations, merge_probability);
                workload.verify = verify;
                Ok(workload)
            }
            _ => Err(WorkloadError::BadField("ops")),
        }
    }

    /// Each iteration asks for the size of one random element and whether it shares a set with
    /// another, merges the two with probability `merge_probability`, and asks for the set count.
    /// Structure checks are sprinkled in rarely and once at the end.
    pub fn random<R: Rng>(rng: &mut R, num_elems: usize, iterations: usize, merge_probability: f64) -> Workload {
        let mut ops = Vec::new();
        for _ in 0..iterations {
            if num_elems > 0 {
                let a = rng.gen_range(0..num_elems);
                let b = rng.gen_range(0..num_elems);
                ops.push(Op::Size(a));
                ops.push(Op::Same(a, b));
                if rng.gen::<f64>() < merge_probability {
                    ops.push(Op::Merge(a, b));
                }
            }
            ops.push(Op::Count);
            if rng.gen::<f64>() < 0.001 {
                ops.push(Op::Check);
            }
        }
        ops.push(Op::Check);

        Workload {
            num_elems: i64::try_from(num_elems).unwrap_or(i64::MAX),
            ops,
            verify: false,
        }
    }

    pub fn replay(&self) -> Result<Vec<Outcome>, WorkloadError> {
        let mut ds = DisjointSet::try_new(self.num_elems)?;
        let mut reference = if self.verify {
            Some(NaiveDisjointSet::new(ds.len()))
        } else {
            None
        };
        info!("replaying {} operations over {} elements (verify: {})",
            self.ops.len(), ds.len(), self.verify);

        let mut outcomes = Vec::with_capacity(self.ops.len());
        for (step, &op) in self.ops.iter().enumerate() {
            let actual = apply(&mut ds, op)
                .map_err(|source| WorkloadError::Replay { step, op, source })?;
            debug!("{}: {} -> {}", step, op, actual);

            if let Some(reference) = reference.as_mut() {
                let expected = apply_reference(reference, op);
                if expected != actual {
                    warn!("step {}: `{}` gave {} but the reference gave {}", step, op, actual, expected);
                    return Err(WorkloadError::Mismatch { step, op, expected, actual });
                }
            }
            outcomes.push(actual);
        }

        info!("done, {} sets remain", ds.num_sets());
        Ok(outcomes)
    }
}

/// Writes one outcome per line and flushes, so buffered writers report their errors here.
pub fn write_outcomes<W: Write>(mut out: W, outcomes: &[Outcome]) -> io::Result<()> {
    for outcome in outcomes {
        writeln!(out, "{}", outcome)?;
    }
    out.flush()
}

fn apply(ds: &mut DisjointSet, op: Op) -> Result<Outcome, DisjointSetError> {
    Ok(match op {
        Op::Merge(a, b) => Outcome::Bool(ds.merge_sets(a, b)?),
        Op::Same(a, b) => Outcome::Bool(ds.are_in_same_set(a, b)?),
        Op::Size(a) => Outcome::Number(ds.size_of_set(a)?),
        Op::Count => Outcome::Number(ds.num_sets()),
        Op::Check => {
            ds.check_structure()?;
            Outcome::Checked
        }
    })
}

fn apply_reference(nds: &mut NaiveDisjointSet, op: Op) -> Outcome {
    match op {
        Op::Merge(a, b) => Outcome::Bool(nds.merge_sets(a, b)),
        Op::Same(a, b) => Outcome::Bool(nds.are_in_same_set(a, b)),
        Op::Size(a) => Outcome::Number(nds.size_of_set(a)),
        Op::Count => Outcome::Number(nds.num_sets()),
        Op::Check => Outcome::Checked,
    }
}

fn optional<T>(value: &Value, field: &'static str, default: T,
    get: impl Fn(&Value) -> Option<T>) -> Result<T, WorkloadError> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => get(v).ok_or(WorkloadError::BadField(field)),
    }
}

// Ops are arrays: the op name, then its operands.
fn parse_op(step: usize, value: &Value) -> Result<Op, WorkloadError> {
    let bad = |reason: String| WorkloadError::BadOp { step, reason };

    let parts = value.as_array()
        .ok_or_else(|| bad(format!("expected an array, found {}", value)))?;
    let name = parts.first()
        .and_then(Value::as_str)
        .ok_or_else(|| bad("the first entry must name the operation".to_string()))?;
    let operands = parts[1..].iter()
        .map(|v| {
            v.as_u64()
                .and_then(|x| usize::try_from(x).ok())
                .ok_or_else(|| bad(format!("operand {} is not an element index", v)))
        })
        .collect::<Result<Vec<usize>, _>>()?;

    match (name, operands.as_slice()) {
        ("merge", &[a, b]) => Ok(Op::Merge(a, b)),
        ("same", &[a, b]) => Ok(Op::Same(a, b)),
        ("size", &[a]) => Ok(Op::Size(a)),
        ("count", &[]) => Ok(Op::Count),
        ("check", &[]) => Ok(Op::Check),
        ("merge" | "same" | "size" | "count" | "check", _) => {
            Err(bad(format!("`{}` does not take {} operands", name, operands.len())))
        }
        _ => Err(bad(format!("unknown operation `{}`", name))),
    }
}
