//! SQL 渲染
//!
//! 将 `Condition` 列表渲染为 PostgreSQL 风格的 `WHERE` 片段：标识符使用双引号，
//! 值以 `$n` 占位并按出现顺序收集到绑定列表。空 `IN`/空析取渲染为 `FALSE`，
//! 空合取渲染为 `TRUE`。
//!
use crate::query::{Condition, Subquery};
use crate::value::Value;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.sql)?;
        for (i, param) in self.params.iter().enumerate() {
            writeln!(f, "-- ${} = {}", i + 1, param)?;
        }
        Ok(())
    }
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 渲染条件的合取
pub fn render_where(conditions: &[Condition]) -> SqlFragment {
    let mut writer = SqlWriter::default();
    writer.junction(conditions, "AND", "TRUE");
    writer.finish()
}

/// 渲染完整的身份查询：`SELECT * FROM entity WHERE ...`
pub fn render_select(entity: &str, conditions: &[Condition]) -> SqlFragment {
    let mut writer = SqlWriter::default();
    writer.sql.push_str("SELECT * FROM ");
    writer.sql.push_str(&quote_identifier(entity));
    writer.sql.push_str(" WHERE ");
    writer.junction(conditions, "AND", "TRUE");
    writer.finish()
}

#[derive(Default)]
struct SqlWriter {
    sql: String,
    params: Vec<Value>,
}

impl SqlWriter {
    fn finish(self) -> SqlFragment {
        SqlFragment {
            sql: self.sql,
            params: self.params,
        }
    }

    fn bind(&mut self, value: &Value) -> String {
        self.params.push(value.clone());
        format!("${}", self.params.len())
    }

    fn condition(&mut self, condition: &Condition) {
        match condition {
            Condition::Eq { property, value } => self.comparison(property, "=", value),
            Condition::Gt { property, value } => self.comparison(property, ">", value),
            Condition::Lt { property, value } => self.comparison(property, "<", value),
            Condition::In { property, values } => {
                if values.is_empty() {
                    self.sql.push_str("FALSE");
                    return;
                }
                let placeholders: Vec<String> = values.iter().map(|v| self.bind(v)).collect();
                self.sql.push_str(&format!(
                    "{} IN ({})",
                    quote_identifier(property),
                    placeholders.join(", ")
                ));
            }
            Condition::And(conditions) => self.junction(conditions, "AND", "TRUE"),
            Condition::Or(conditions) => self.junction(conditions, "OR", "FALSE"),
            Condition::InSubquery { property, subquery } => {
                self.sql.push_str(&quote_identifier(property));
                self.sql.push_str(" IN (");
                self.subquery(subquery);
                self.sql.push(')');
            }
        }
    }

    fn comparison(&mut self, property: &str, op: &str, value: &Value) {
        let placeholder = self.bind(value);
        self.sql
            .push_str(&format!("{} {op} {placeholder}", quote_identifier(property)));
    }

    fn junction(&mut self, conditions: &[Condition], op: &str, empty: &str) {
        match conditions {
            [] => self.sql.push_str(empty),
            [single] => self.condition(single),
            _ => {
                self.sql.push('(');
                for (i, condition) in conditions.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(&format!(" {op} "));
                    }
                    self.condition(condition);
                }
                self.sql.push(')');
            }
        }
    }

    fn subquery(&mut self, subquery: &Subquery<Condition>) {
        self.sql.push_str(&format!(
            "SELECT {} FROM {} WHERE ",
            quote_identifier(&subquery.selection),
            quote_identifier(&subquery.entity)
        ));
        self.condition(&subquery.restriction);
        if let Some(having) = &subquery.having {
            self.sql.push_str(&format!(
                " GROUP BY {} HAVING COUNT(*) = {}",
                quote_identifier(&having.group_by),
                having.count
            ));
        }
    }
}

/// 将渲染结果的绑定值依次绑定到 sqlx 查询
#[cfg(feature = "infra-sqlx")]
pub fn bind_params<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    params: &'q [Value],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Integer(i) => query.bind(*i),
            Value::Text(s) => query.bind(s.as_str()),
            Value::Timestamp(t) => query.bind(*t),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Criteria, CriteriaBuilder, HavingCount};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_attribute_subquery_with_placeholders() {
        let condition = Criteria.in_subquery(
            "id",
            Subquery {
                entity: "identity_object_attribute".into(),
                selection: "identity".into(),
                restriction: Criteria.conjunction(vec![
                    Criteria.equal("name", Value::from("role")),
                    Criteria.is_in("value", vec![Value::from("a"), Value::from("b")]),
                ]),
                having: Some(HavingCount {
                    group_by: "identity".into(),
                    count: 2,
                }),
            },
        );
        let fragment = render_where(&[Criteria.equal("enabled", Value::from(true)), condition]);
        assert_eq!(
            fragment.sql,
            "(\"enabled\" = $1 AND \"id\" IN (SELECT \"identity\" FROM \"identity_object_attribute\" \
             WHERE (\"name\" = $2 AND \"value\" IN ($3, $4)) GROUP BY \"identity\" HAVING COUNT(*) = 2))"
        );
        assert_eq!(
            fragment.params,
            vec![
                Value::from(true),
                Value::from("role"),
                Value::from("a"),
                Value::from("b")
            ]
        );
    }

    #[test]
    fn empty_connectives_render_as_constants() {
        assert_eq!(render_where(&[]).sql, "TRUE");
        assert_eq!(render_where(&[Condition::never()]).sql, "FALSE");
        assert_eq!(render_where(&[Criteria.is_in("value", vec![])]).sql, "FALSE");
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
        let fragment = render_select("identity_object", &[Criteria.less_than("created", Value::from(1_i64))]);
        assert_eq!(
            fragment.sql,
            "SELECT * FROM \"identity_object\" WHERE \"created\" < $1"
        );
    }
}

#[cfg(all(test, feature = "infra-sqlx"))]
mod sqlx_tests {
    use super::*;
    use crate::query::{Criteria, CriteriaBuilder};
    use chrono::Utc;
    use sqlx::Execute;

    #[test]
    fn binds_every_value_kind_onto_a_postgres_query() {
        let fragment = render_select(
            "identity_object",
            &[
                Criteria.equal("enabled", Value::from(true)),
                Criteria.less_than("created", Value::from(Utc::now())),
                Criteria.is_in(
                    "key",
                    vec![Value::from("jdoe"), Value::from(7_i64), Value::Null],
                ),
            ],
        );
        assert_eq!(fragment.params.len(), 5);

        let query = bind_params(sqlx::query(&fragment.sql), &fragment.params);
        assert_eq!(query.sql(), fragment.sql);
    }
}
