//! `case`-expression pattern matching.
//!
//! Grounded on `evaluator.go`'s `caseLoop`, with two deliberate departures
//! recorded in `DESIGN.md`: an empty `{}` pattern matches any table (the
//! reference implementation leaves `patternResult` `nil` and panics), and a
//! bare `...` checks "does the subject have an entry no earlier pattern
//! entry consumed", not the reference implementation's
//! entries-count-versus-case-count heuristic.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use zygon_par::{NodeKind, TableEntryNode};
use zygon_util::Symbol;

use crate::error::{EvalError, EvalResult};
use crate::interpreter::Evaluator;
use crate::value::{renumber, Entries, Value};

impl Evaluator {
    /// Attempts to match `pattern` against `subject`. `Ok(Some(bindings))`
    /// on success, `Ok(None)` on a clean non-match (try the next arm),
    /// `Err` only when evaluating part of the pattern itself fails.
    pub(crate) fn try_match_pattern(
        &mut self,
        pattern: &zygon_par::Node,
        subject: &Value,
        env: crate::env::EnvId,
    ) -> EvalResult<Option<IndexMap<Symbol, Value>>> {
        if let NodeKind::TableLiteral(entries) = &pattern.kind {
            return match subject.as_table() {
                Some(table) => self.try_match_table_pattern(entries, table, env),
                None => Ok(None),
            };
        }
        let expected = self.eval(pattern, env)?;
        Ok(if &expected == subject {
            Some(IndexMap::new())
        } else {
            None
        })
    }

    fn try_match_table_pattern(
        &mut self,
        entries: &[TableEntryNode],
        subject_table: &Rc<RefCell<Entries>>,
        env: crate::env::EnvId,
    ) -> EvalResult<Option<IndexMap<Symbol, Value>>> {
        if entries.is_empty() {
            return Ok(Some(IndexMap::new()));
        }

        let mut bindings = IndexMap::new();
        let mut consumed: Vec<Value> = Vec::new();
        let mut positional_index: i64 = 0;
        let mut bare_rest = false;

        for entry in entries {
            if let NodeKind::RestOperator(inner) = &entry.value.kind {
                match inner {
                    None => {
                        bare_rest = true;
                        continue;
                    }
                    Some(id_node) => {
                        let name = match &id_node.kind {
                            NodeKind::Identifier(s) => *s,
                            _ => {
                                return Err(EvalError::RestPatternRequiresIdentifier {
                                    span: entry.value.span,
                                })
                            }
                        };
                        let remainder = {
                            let table = subject_table.borrow();
                            let mut rem = Entries::new();
                            for (k, v) in table.iter() {
                                if consumed.contains(k) {
                                    continue;
                                }
                                rem.insert(k.clone(), v.clone());
                            }
                            renumber(&rem)
                        };
                        bindings.insert(name, Value::new_table(remainder));
                        continue;
                    }
                }
            }

            let key = match entry.key {
                Some(sym) => Value::TableKey(sym),
                None => {
                    let k = Value::Number(positional_index as f64);
                    positional_index += 1;
                    k
                }
            };
            let found = subject_table.borrow().get(&key).cloned();
            let Some(found_value) = found else {
                return Ok(None);
            };
            consumed.push(key);

            match &entry.value.kind {
                NodeKind::Identifier(sym) => {
                    bindings.insert(*sym, found_value);
                }
                _ => {
                    let expected = self.eval(&entry.value, env)?;
                    if expected != found_value {
                        return Ok(None);
                    }
                }
            }
        }

        if bare_rest && subject_table.borrow().len() <= consumed.len() {
            return Ok(None);
        }

        Ok(Some(bindings))
    }
}
