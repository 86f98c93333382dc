use anyhow::Result as AnyResult;
use chrono::{Duration, Utc};
use identity_domain::model::{IdentityType, Timestamp, User};
use identity_domain::persist::{
    DiscriminatorRegistry, GenericRecord, IdentityStoreConfig, ModelProperty, PartitionIdResolver,
    PropertyBindings, RecordMapper, UserHandler,
};
use identity_domain::query::{
    Condition, Criteria, IdentityQuery, InMemoryIdentityStore, PredicateCompiler, QueryParameter,
    sql,
};
use identity_domain::value::Value;
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct Fixture {
    compiler: PredicateCompiler,
    store: InMemoryIdentityStore<GenericRecord>,
    base: Timestamp,
}

impl Fixture {
    fn new(config: IdentityStoreConfig) -> AnyResult<Self> {
        let config = Arc::new(config);
        let mapper = RecordMapper::<GenericRecord, _>::new(
            config.clone(),
            Arc::new(DiscriminatorRegistry::standard()),
            Arc::new(PartitionIdResolver),
            UserHandler,
        );
        let mut store = InMemoryIdentityStore::new(config.clone());
        let base = Utc::now();

        let users: [(&str, &[&str], bool, i64); 4] = [
            ("abc", &["a", "b", "c"], true, 0),
            ("a", &["a"], true, 1),
            ("ab", &["a", "b"], false, 2),
            ("none", &[], true, 3),
        ];
        for (key, roles, enabled, age_days) in users {
            let mut user = User::new(key.to_string());
            user.set_enabled(enabled);
            user.set_created_date(base - Duration::days(age_days));
            user.attributes_mut().set("role", roles.iter().copied());
            user.attributes_mut().add("team", "core");

            let record = mapper.create_record(None, &user)?;
            let owner = mapper.reference_of(&record)?;
            let rows: Vec<GenericRecord> = mapper.create_attribute_records(&owner, &user)?;
            store.insert_identity(record);
            store.insert_attributes(rows);
        }

        Ok(Self {
            compiler: PredicateCompiler::new(config),
            store,
            base,
        })
    }

    fn keys(&self, query: &IdentityQuery) -> AnyResult<Vec<String>> {
        let conditions = self.compiler.compile_query(&Criteria, query)?;
        let mut keys: Vec<String> = self
            .store
            .select(&conditions)?
            .into_iter()
            .filter_map(|r| {
                identity_domain::persist::Record::property(r, "key")
                    .and_then(Value::as_text)
                    .map(String::from)
            })
            .collect();
        keys.sort();
        Ok(keys)
    }
}

fn role(values: &[&str]) -> IdentityQuery {
    IdentityQuery::new().with(QueryParameter::attribute("role"), values.iter().copied())
}

#[test]
fn attribute_values_use_and_semantics() -> AnyResult<()> {
    let fixture = Fixture::new(IdentityStoreConfig::conventional())?;
    // 拥有 a、b、c 的身份匹配 [a, b]；只有 a 的身份不匹配
    assert_eq!(fixture.keys(&role(&["a", "b"]))?, vec!["ab", "abc"]);
    assert_eq!(fixture.keys(&role(&["a"]))?, vec!["a", "ab", "abc"]);
    assert_eq!(fixture.keys(&role(&["a", "b", "c"]))?, vec!["abc"]);
    assert!(fixture.keys(&role(&["a", "z"]))?.is_empty());
    Ok(())
}

#[test]
fn other_attribute_names_do_not_count_toward_the_target() -> AnyResult<()> {
    let fixture = Fixture::new(IdentityStoreConfig::conventional())?;
    // "core" 属于 team，不属于 role
    assert!(fixture.keys(&role(&["a", "core"]))?.is_empty());
    let team = IdentityQuery::new().with(QueryParameter::attribute("team"), ["core"]);
    assert_eq!(fixture.keys(&team)?.len(), 4);
    Ok(())
}

#[test]
fn empty_attribute_values_match_nothing_for_any_schema() -> AnyResult<()> {
    let schemas = [
        IdentityStoreConfig::conventional(),
        IdentityStoreConfig::builder()
            .bindings(PropertyBindings::conventional().unbind(ModelProperty::IdentityId))
            .build(),
    ];
    for config in schemas {
        let fixture = Fixture::new(config)?;
        assert!(fixture.keys(&role(&[]))?.is_empty());
        // 即使与恒真的条件合取也不命中
        let query = role(&[]).with(QueryParameter::Enabled, [true]);
        assert!(fixture.keys(&query)?.is_empty());
    }

    // 未绑定属性记录的存储模式同样得到恒假谓词
    let bare = IdentityStoreConfig::builder()
        .bindings(
            PropertyBindings::conventional()
                .unbind(ModelProperty::AttributeIdentity)
                .unbind(ModelProperty::AttributeName)
                .unbind(ModelProperty::AttributeValue),
        )
        .build();
    let fixture = Fixture::new(IdentityStoreConfig::conventional())?;
    let conditions = PredicateCompiler::new(Arc::new(bare)).compile_query(&Criteria, &role(&[]))?;
    assert_eq!(conditions, vec![Condition::never()]);
    assert!(fixture.store.select(&conditions)?.is_empty());
    Ok(())
}

#[test]
fn duplicated_values_require_duplicated_rows() -> AnyResult<()> {
    let fixture = Fixture::new(IdentityStoreConfig::conventional())?;
    assert!(fixture.keys(&role(&["a", "a"]))?.is_empty());

    let dedupe = IdentityStoreConfig::builder()
        .bindings(PropertyBindings::conventional())
        .dedupe_attribute_values(true)
        .build();
    let fixture = Fixture::new(dedupe)?;
    assert_eq!(fixture.keys(&role(&["a", "a"]))?, vec!["a", "ab", "abc"]);
    Ok(())
}

#[test]
fn key_reference_schema_matches_the_same_identities() -> AnyResult<()> {
    let config = IdentityStoreConfig::builder()
        .bindings(PropertyBindings::conventional().unbind(ModelProperty::IdentityId))
        .build();
    let fixture = Fixture::new(config)?;
    assert_eq!(fixture.keys(&role(&["a", "b"]))?, vec!["ab", "abc"]);
    Ok(())
}

#[test]
fn scalar_parameters_filter_common_fields() -> AnyResult<()> {
    let fixture = Fixture::new(IdentityStoreConfig::conventional())?;
    let base = fixture.base;

    let enabled = IdentityQuery::new().with(QueryParameter::Enabled, [true]);
    assert_eq!(fixture.keys(&enabled)?, vec!["a", "abc", "none"]);

    // 严格比较：边界上的身份不包含在内
    let after = IdentityQuery::new().with(QueryParameter::CreatedAfter, [base - Duration::days(2)]);
    assert_eq!(fixture.keys(&after)?, vec!["a", "abc"]);
    let before = IdentityQuery::new().with(QueryParameter::CreatedBefore, [base - Duration::days(2)]);
    assert_eq!(fixture.keys(&before)?, vec!["none"]);

    let exact = IdentityQuery::new().with(QueryParameter::CreatedDate, [base]);
    assert_eq!(fixture.keys(&exact)?, vec!["abc"]);

    // 无过期时间的身份不参与过期比较
    let expiry = IdentityQuery::new().with(QueryParameter::ExpiryBefore, [base]);
    assert!(fixture.keys(&expiry)?.is_empty());
    Ok(())
}

#[test]
fn combined_query_is_a_conjunction() -> AnyResult<()> {
    let fixture = Fixture::new(IdentityStoreConfig::conventional())?;
    let query = role(&["a", "b"])
        .with(QueryParameter::Enabled, [true])
        .with(QueryParameter::other("first_name"), ["ignored"]);
    assert_eq!(fixture.keys(&query)?, vec!["abc"]);

    let conjunction = fixture.compiler.compile_conjunction(&Criteria, &query)?;
    match conjunction {
        Condition::And(parts) => assert_eq!(parts.len(), 2),
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[test]
fn compiled_query_renders_to_sql() -> AnyResult<()> {
    let fixture = Fixture::new(IdentityStoreConfig::conventional())?;
    let query = IdentityQuery::new()
        .with(QueryParameter::Enabled, [true])
        .with(QueryParameter::attribute("role"), ["a"]);
    let conditions = fixture.compiler.compile_query(&Criteria, &query)?;
    let fragment = sql::render_select(fixture.compiler.config().identity_entity(), &conditions);
    assert_eq!(
        fragment.sql,
        "SELECT * FROM \"identity_object\" WHERE (\"enabled\" = $1 AND \"id\" IN \
         (SELECT \"identity\" FROM \"identity_object_attribute\" WHERE (\"name\" = $2 AND \
         \"value\" IN ($3)) GROUP BY \"identity\" HAVING COUNT(*) = 1))"
    );
    assert_eq!(fragment.params.len(), 3);
    Ok(())
}
