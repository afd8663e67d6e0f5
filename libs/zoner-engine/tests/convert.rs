use std::any::TypeId;
use std::cell::RefCell;
use std::sync::OnceLock;

use zoner_api::reflect::foreign_field;
use zoner_api::{
    AccessError, DeclaredType, ErrorKind, FieldDescriptor, FieldMeta, FromValue, Object, Reflect,
    Shared, TargetDecl, ToValue, TypeInfo, TypeInfoBuilder, Typed, Value, Zoner,
};
use zoner_engine::{
    processor_fn, Descend, FieldOverride, MapError, MapLogger, Mapper, MapperConfig,
    ProvenanceProcessor, ValueCache,
};

// ---------------------------------------------------------------------------
// Persistence model
// ---------------------------------------------------------------------------

#[derive(Zoner, Default)]
#[zoner(to = CompanyWire)]
struct Company {
    #[zoner(write_cache = "xyzId")]
    id: String,
    name: String,
    emp: Option<Shared<Emp>>,
    staff: Vec<Shared<Emp>>,
}

#[derive(Zoner, Default)]
#[zoner(to = EmpWire)]
struct Emp {
    #[zoner(read_cache = "xyzId", rename = "company_id")]
    comp_id: String,
    #[zoner(rename = "emp_name")]
    name: String,
    desg: Option<Shared<Designation>>,
}

#[derive(Zoner, Default)]
struct Designation {
    title: String,
    #[zoner(read_cache = "xyzId", skip)]
    company_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire model
// ---------------------------------------------------------------------------

#[derive(Zoner, Default)]
struct CompanyWire {
    id: String,
    name: String,
    emp: Option<Shared<Emp>>,
    staff: Vec<Shared<Emp>>,
    company_id: String,
    emp_name: String,
    desg: Option<Shared<Designation>>,
    title: String,
}

#[derive(Zoner, Default)]
struct EmpWire {
    company_id: String,
    emp_name: String,
    desg: Option<Shared<Designation>>,
    title: String,
}

fn emp(name: &str, title: &str) -> Shared<Emp> {
    Shared::new(Emp {
        comp_id: String::new(),
        name: name.into(),
        desg: Some(Shared::new(Designation {
            title: title.into(),
            company_id: None,
        })),
    })
}

fn company() -> Shared<Company> {
    Shared::new(Company {
        id: "C1".into(),
        name: "Acme".into(),
        emp: Some(emp("ann", "engineer")),
        staff: Vec::new(),
    })
}

fn quiet<'a>() -> zoner_engine::MapperBuilder<'a> {
    Mapper::builder().logger(zoner_engine::NoopLogger)
}

// ---------------------------------------------------------------------------
// Core conversion
// ---------------------------------------------------------------------------

#[test]
fn test_cached_id_reaches_nested_employee() {
    let source = company();
    let mut mapper = quiet().build_from(&source).unwrap();
    let target = mapper.convert_into::<CompanyWire>().unwrap();
    let target = target.borrow();

    let emp = target.emp.as_ref().unwrap();
    assert_eq!(emp.borrow().comp_id, "C1");
    assert!(emp.ptr_eq(source.borrow().emp.as_ref().unwrap()));

    assert_eq!(target.id, "C1");
    assert_eq!(target.company_id, "C1");
    assert_eq!(target.title, "engineer");

    // Skipped, but still cache-filled on the source.
    let desg = emp.borrow().desg.clone().unwrap();
    assert_eq!(desg.borrow().company_id.as_deref(), Some("C1"));
    assert_eq!(mapper.cache().get("xyzId"), Some(&Value::from("C1")));
}

#[test]
fn test_target_has_exactly_the_declared_type() {
    let mut mapper = Mapper::build(company().to_object()).unwrap();
    let target = mapper.convert().unwrap();
    assert!(target.is::<CompanyWire>());
    assert_eq!(target.type_info().name(), "CompanyWire");
    assert!(target.ptr_eq(mapper.target().unwrap()));
}

#[test]
fn test_rename_writes_only_the_renamed_field() {
    let source = company();
    let target = quiet()
        .build_from(&source)
        .unwrap()
        .convert_into::<CompanyWire>()
        .unwrap();
    let target = target.borrow();
    assert_eq!(target.emp_name, "ann");
    assert_eq!(target.name, "Acme");
}

#[test]
fn test_missing_target_field_stops_the_conversion() {
    #[derive(Zoner, Default)]
    #[zoner(to = CompanyWire)]
    struct Misnamed {
        id: String,
        #[zoner(rename = "nope")]
        name: String,
        after: String,
    }

    let seen = RefCell::new(Vec::new());
    let source = Shared::new(Misnamed {
        id: "M1".into(),
        name: "x".into(),
        after: "y".into(),
    });
    let mut mapper = quiet()
        .processor(processor_fn(|field: &FieldDescriptor, _: &Value, _: &Object| {
            seen.borrow_mut().push(field.name())
        }))
        .build_from(&source)
        .unwrap();

    let err = mapper.convert().unwrap_err();
    match err {
        MapError::MissingTargetField {
            field,
            target_type,
            owner,
            source_field,
        } => {
            assert_eq!(field, "nope");
            assert_eq!(target_type, "CompanyWire");
            assert_eq!(owner, "Misnamed");
            assert_eq!(source_field, "name");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(mapper.target().is_none());
    assert!(mapper.convert().is_err());
    drop(mapper);
    assert_eq!(*seen.borrow(), vec!["id", "id"]);
}

#[test]
fn test_type_without_target_is_rejected_at_bind_time() {
    let err = Mapper::build(Object::new(Designation::default())).unwrap_err();
    assert!(matches!(err, MapError::NoTargetType { source_type: "Designation" }));
}

#[test]
fn test_readonly_target_field_is_an_access_error() {
    #[derive(Zoner, Default)]
    #[zoner(to = LockedWire)]
    struct Locked {
        id: String,
    }

    #[derive(Zoner, Default)]
    struct LockedWire {
        #[zoner(readonly)]
        id: String,
    }

    let mut mapper = quiet().build(Object::new(Locked { id: "L".into() })).unwrap();
    match mapper.convert().unwrap_err() {
        MapError::FieldAccess { field, owner, cause } => {
            assert_eq!((field, owner), ("id", "LockedWire"));
            assert_eq!(cause.kind, ErrorKind::ReadOnly);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Skip, cache and hooks
// ---------------------------------------------------------------------------

#[test]
fn test_skip_keeps_cache_write_and_hook() {
    let source = company();
    let mut hooked = Vec::new();
    let mut mapper = quiet()
        .override_field(FieldOverride {
            type_name: "Company".into(),
            field: "id".into(),
            skip: Some(true),
            ..Default::default()
        })
        .processor(processor_fn(|field: &FieldDescriptor, value: &Value, _: &Object| {
            hooked.push((field.name(), value.clone()))
        }))
        .build_from(&source)
        .unwrap();
    let target = mapper.convert_into::<CompanyWire>().unwrap();
    drop(mapper);

    assert_eq!(target.borrow().id, "");
    assert_eq!(target.borrow().company_id, "C1");
    assert_eq!(hooked[0], ("id", Value::from("C1")));
}

#[test]
fn test_cache_is_shared_only_on_request() {
    let source = company();
    let mut first = quiet().build_from(&source).unwrap();
    first.convert().unwrap();
    let cache = first.into_cache();

    let lone = emp("bob", "tester");
    quiet().build_from(&lone).unwrap().convert().unwrap();
    assert_eq!(lone.borrow().comp_id, "");

    let seeded = emp("cid", "tester");
    let target = quiet()
        .cache(cache)
        .build_from(&seeded)
        .unwrap()
        .convert_into::<EmpWire>()
        .unwrap();
    assert_eq!(seeded.borrow().comp_id, "C1");
    assert_eq!(target.borrow().company_id, "C1");
}

#[test]
fn test_cached_null_does_not_fill() {
    let source = emp("ann", "engineer");
    source.borrow_mut().comp_id = "own".into();
    let cache: ValueCache = [("xyzId", Value::Null)].into_iter().collect();
    quiet().cache(cache).build_from(&source).unwrap().convert().unwrap();
    assert_eq!(source.borrow().comp_id, "own");
}

#[test]
fn test_mistyped_cache_value_names_the_source_field() {
    let source = emp("ann", "engineer");
    let cache: ValueCache = [("xyzId", Value::Int(5))].into_iter().collect();
    let mut mapper = quiet().cache(cache).build_from(&source).unwrap();
    match mapper.convert().unwrap_err() {
        MapError::FieldAccess { field, owner, cause } => {
            assert_eq!((field, owner), ("comp_id", "Emp"));
            assert_eq!(cause.kind, ErrorKind::TypeMismatch);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_provenance_follows_descent() {
    let source = company();
    let mut provenance = ProvenanceProcessor::new();
    quiet()
        .processor(&mut provenance)
        .build_from(&source)
        .unwrap()
        .convert()
        .unwrap();

    let paths: Vec<_> = provenance
        .records()
        .iter()
        .map(|p| (p.path.as_str(), p.owner))
        .collect();
    assert_eq!(
        paths,
        vec![
            ("id", "Company"),
            ("name", "Company"),
            ("emp", "Company"),
            ("emp.comp_id", "Emp"),
            ("emp.name", "Emp"),
            ("emp.desg", "Emp"),
            ("emp.desg.title", "Designation"),
            ("emp.desg.company_id", "Designation"),
            ("staff", "Company"),
        ]
    );
}

#[test]
fn test_two_mappers_agree() {
    let source = company();
    let first = quiet().build_from(&source).unwrap().convert().unwrap();
    let second = quiet().build_from(&source).unwrap().convert().unwrap();
    assert!(!first.ptr_eq(&second));
    assert_eq!(Value::Object(first).to_json(), Value::Object(second).to_json());
}

#[test]
fn test_reconvert_reuses_target_and_cache() {
    let source = company();
    let mut mapper = quiet().build_from(&source).unwrap();
    let first = mapper.convert().unwrap();
    source.borrow_mut().name = "Renamed".into();
    let second = mapper.convert().unwrap();
    assert!(first.ptr_eq(&second));
    assert_eq!(second.downcast::<CompanyWire>().unwrap().borrow().name, "Renamed");
}

// ---------------------------------------------------------------------------
// Descend policies
// ---------------------------------------------------------------------------

fn staffed() -> Shared<Company> {
    let company = company();
    company.borrow_mut().emp = None;
    company.borrow_mut().staff = vec![emp("ann", "engineer"), emp("bob", "tester")];
    company
}

#[test]
fn test_default_policy_leaves_collections_alone() {
    let source = staffed();
    let target = quiet()
        .build_from(&source)
        .unwrap()
        .convert_into::<CompanyWire>()
        .unwrap();
    assert_eq!(target.borrow().staff.len(), 2);
    assert_eq!(target.borrow().emp_name, "");
    assert!(source.borrow().staff.iter().all(|e| e.borrow().comp_id.is_empty()));
}

#[test]
fn test_collection_policies_crawl_elements() {
    for descend in [Descend::NullOrCollection, Descend::ObjectsAndCollections] {
        let source = staffed();
        let target = quiet()
            .descend(descend)
            .build_from(&source)
            .unwrap()
            .convert_into::<CompanyWire>()
            .unwrap();
        // Last write wins across elements.
        assert_eq!(target.borrow().emp_name, "bob", "{descend:?}");
        assert!(source.borrow().staff.iter().all(|e| e.borrow().comp_id == "C1"));

        // Designations hang off plain fields: entered only by the object policy.
        let title = if descend == Descend::ObjectsAndCollections { "tester" } else { "" };
        assert_eq!(target.borrow().title, title, "{descend:?}");
    }
}

#[test]
fn test_null_or_collection_does_not_enter_plain_objects() {
    let source = company();
    let target = quiet()
        .descend(Descend::NullOrCollection)
        .build_from(&source)
        .unwrap()
        .convert_into::<CompanyWire>()
        .unwrap();
    assert_eq!(target.borrow().emp_name, "");
    assert!(target.borrow().emp.is_some());
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

#[derive(Zoner, Default)]
#[zoner(to = NodeWire)]
struct Node {
    label: String,
    next: Option<Shared<Node>>,
}

#[derive(Zoner, Default)]
struct NodeWire {
    label: String,
    next: Option<Shared<Node>>,
}

#[test]
fn test_cycle_is_detected() {
    let a = Shared::new(Node { label: "a".into(), next: None });
    let b = Shared::new(Node { label: "b".into(), next: Some(a.clone()) });
    a.borrow_mut().next = Some(b.clone());

    let err = quiet().build_from(&a).unwrap().convert().unwrap_err();
    assert!(matches!(err, MapError::CycleDetected { type_name: "Node", .. }));

    a.borrow_mut().next = None;
    let target = quiet()
        .build_from(&b)
        .unwrap()
        .convert_into::<NodeWire>()
        .unwrap();
    assert_eq!(target.borrow().label, "a");
}

// ---------------------------------------------------------------------------
// Inheritance and statics
// ---------------------------------------------------------------------------

#[derive(Zoner, Default)]
struct Entity {
    #[zoner(rename = "entity_id")]
    id: i64,
    created: i64,
}

#[derive(Zoner, Default)]
#[zoner(to = AccountWire)]
struct Account {
    #[zoner(base)]
    entity: Entity,
    id: String,
    owner: String,
}

#[derive(Zoner, Default)]
struct AccountWire {
    id: String,
    owner: String,
    entity_id: i64,
    created: i64,
}

#[test]
fn test_inherited_fields_are_mapped() {
    let source = Shared::new(Account {
        entity: Entity { id: 42, created: 1_700 },
        id: "acc-1".into(),
        owner: "ann".into(),
    });
    let target = quiet()
        .build_from(&source)
        .unwrap()
        .convert_into::<AccountWire>()
        .unwrap();
    let target = target.borrow();
    assert_eq!(target.id, "acc-1");
    assert_eq!(target.entity_id, 42);
    assert_eq!(target.created, 1_700);
}

thread_local! {
    static REGION: RefCell<String> = RefCell::new("EU".to_string());
}

fn region_field(b: TypeInfoBuilder) -> TypeInfoBuilder {
    b.static_field(
        "region",
        DeclaredType::plain("String"),
        FieldMeta::default(),
        || REGION.with(|r| Value::String(r.borrow().clone())),
        |v| {
            let v: String = FromValue::from_value(v)?;
            REGION.with(|r| *r.borrow_mut() = v);
            Ok(())
        },
    )
}

#[derive(Zoner, Default)]
#[zoner(to = BranchWire, statics = region_field)]
struct Branch {
    code: String,
}

#[derive(Zoner, Default)]
struct BranchWire {
    code: String,
    region: String,
}

#[derive(Zoner, Default)]
#[zoner(to = LedgerWire)]
struct Ledger {
    #[zoner(base)]
    account: Account,
    balance: i64,
}

#[derive(Zoner, Default)]
struct LedgerWire {
    balance: i64,
    id: String,
    owner: String,
    entity_id: i64,
    created: i64,
}

#[test]
fn test_two_level_base_chain() {
    let info = Ledger::info();
    let fields: Vec<_> = info
        .all_fields()
        .iter()
        .map(|f| (f.owner_name(), f.name()))
        .collect();
    assert_eq!(
        fields,
        [
            ("Ledger", "balance"),
            ("Account", "id"),
            ("Account", "owner"),
            ("Entity", "id"),
            ("Entity", "created"),
        ]
    );

    let source = Shared::new(Ledger {
        account: Account {
            entity: Entity { id: 7, created: 1_800 },
            id: "acc-2".into(),
            owner: "bob".into(),
        },
        balance: 250,
    });
    let object = source.to_object();
    let created = info.all_fields()[4];
    assert_eq!(created.read(&object).unwrap(), Value::Int(1_800));
    created.write(&object, Value::Int(1_900)).unwrap();
    assert_eq!(source.borrow().account.entity.created, 1_900);

    let target = quiet()
        .build_from(&source)
        .unwrap()
        .convert_into::<LedgerWire>()
        .unwrap();
    let target = target.borrow();
    assert_eq!(target.balance, 250);
    assert_eq!((target.id.as_str(), target.owner.as_str()), ("acc-2", "bob"));
    assert_eq!((target.entity_id, target.created), (7, 1_900));
}

#[test]
fn test_statics_are_gated() {
    let source = Shared::new(Branch { code: "B7".into() });

    let hidden = quiet()
        .build_from(&source)
        .unwrap()
        .convert_into::<BranchWire>()
        .unwrap();
    assert_eq!(hidden.borrow().region, "");

    let shown = quiet()
        .include_statics(true)
        .build_from(&source)
        .unwrap()
        .convert_into::<BranchWire>()
        .unwrap();
    assert_eq!(shown.borrow().code, "B7");
    assert_eq!(shown.borrow().region, "EU");
}

// ---------------------------------------------------------------------------
// Hand-written tables
// ---------------------------------------------------------------------------

/// Reflected type with no fields and a hand-made target declaration.
macro_rules! fieldless {
    ($name:ident, $target:expr) => {
        struct $name;

        impl Reflect for $name {
            fn type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::info()
            }

            fn get_field(&self, field: &FieldDescriptor) -> Result<Value, AccessError> {
                Err(foreign_field(<Self as Typed>::info(), field))
            }

            fn set_field(&mut self, field: &FieldDescriptor, _value: Value) -> Result<(), AccessError> {
                Err(foreign_field(<Self as Typed>::info(), field))
            }
        }

        impl Typed for $name {
            fn info() -> &'static TypeInfo {
                static INFO: OnceLock<TypeInfo> = OnceLock::new();
                INFO.get_or_init(|| {
                    TypeInfo::builder::<$name>(stringify!($name))
                        .target($target)
                        .build()
                })
            }
        }
    };
}

fieldless!(
    Unbuildable,
    TargetDecl::new(CompanyWire::info, || Err(AccessError::construction("needs a registry")))
);

fieldless!(
    Mislabeled,
    TargetDecl::new(CompanyWire::info, || Ok(Object::new(EmpWire::default())))
);

#[test]
fn test_construction_failure_names_both_types() {
    let err = Mapper::build(Object::new(Unbuildable)).unwrap_err();
    match &err {
        MapError::Construction {
            target_type,
            source_type,
            cause,
        } => {
            assert_eq!((*target_type, *source_type), ("CompanyWire", "Unbuildable"));
            assert_eq!(cause.kind, ErrorKind::Construction);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_constructed_type_must_match_declaration() {
    let err = Mapper::build(Object::new(Mislabeled)).unwrap_err();
    assert!(matches!(
        err,
        MapError::TargetType {
            expected: "CompanyWire",
            actual: "EmpWire",
            ..
        }
    ));
}

/// Declares its composite payload as a `String`, so it must not be crawled.
struct Smuggler {
    payload: Shared<Emp>,
}

impl Reflect for Smuggler {
    fn type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::info()
    }

    fn get_field(&self, field: &FieldDescriptor) -> Result<Value, AccessError> {
        if field.owner() == TypeId::of::<Self>() && field.slot() == 0 {
            Ok(self.payload.to_value())
        } else {
            Err(foreign_field(<Self as Typed>::info(), field))
        }
    }

    fn set_field(&mut self, field: &FieldDescriptor, value: Value) -> Result<(), AccessError> {
        if field.owner() == TypeId::of::<Self>() && field.slot() == 0 {
            self.payload = FromValue::from_value(value)?;
            Ok(())
        } else {
            Err(foreign_field(<Self as Typed>::info(), field))
        }
    }
}

impl Typed for Smuggler {
    fn info() -> &'static TypeInfo {
        static INFO: OnceLock<TypeInfo> = OnceLock::new();
        INFO.get_or_init(|| {
            TypeInfo::builder::<Smuggler>("Smuggler")
                .field("payload", DeclaredType::plain("String"), FieldMeta::default())
                .target(TargetDecl::of::<SmuggledWire>())
                .build()
        })
    }
}

#[derive(Zoner, Default)]
struct SmuggledWire {
    payload: Option<Object>,
}

#[test]
fn test_leaf_declared_composite_is_not_crawled() {
    let payload = emp("eve", "spy");
    let source = Shared::new(Smuggler { payload: payload.clone() });
    let mut provenance = ProvenanceProcessor::new();
    let target = quiet()
        .descend(Descend::ObjectsAndCollections)
        .processor(&mut provenance)
        .build(Object::from_shared(&source))
        .unwrap()
        .convert_into::<SmuggledWire>()
        .unwrap();

    assert_eq!(provenance.records().len(), 1);
    let copied = target.borrow().payload.clone().unwrap();
    assert!(copied.ptr_eq(&payload.to_object()));
}

// ---------------------------------------------------------------------------
// Plan validation and configuration
// ---------------------------------------------------------------------------

#[test]
fn test_plan_validation_fails_before_any_field_is_processed() {
    #[derive(Zoner, Default)]
    #[zoner(to = EmpWire)]
    struct Wide {
        company_id: String,
        extra: String,
    }

    let mut processed = 0;
    let err = quiet()
        .validate_plan(true)
        .processor(processor_fn(|_: &FieldDescriptor, _: &Value, _: &Object| processed += 1))
        .build(Object::new(Wide::default()))
        .unwrap_err();
    assert!(matches!(err, MapError::MissingTargetField { ref field, .. } if field == "extra"));
    assert_eq!(processed, 0);

    assert!(quiet().validate_plan(true).build_from(&company()).is_ok());
}

#[derive(Zoner, Default)]
struct Badge {
    code: String,
}

#[derive(Zoner, Default)]
#[zoner(to = HolderWire)]
struct Holder {
    id: String,
    maybe_many: Option<Vec<Shared<Badge>>>,
    sparse: Vec<Option<Shared<Badge>>>,
}

#[derive(Zoner, Default)]
struct HolderWire {
    id: String,
    maybe_many: Value,
    sparse: Value,
}

#[test]
fn test_plan_validation_follows_wrapped_collections() {
    let badge = || Shared::new(Badge { code: "b".into() });
    let source = Shared::new(Holder {
        id: "h".into(),
        maybe_many: Some(vec![badge()]),
        sparse: vec![None, Some(badge())],
    });

    let err = quiet()
        .descend(Descend::ObjectsAndCollections)
        .validate_plan(true)
        .build_from(&source)
        .unwrap_err();
    assert!(matches!(
        err,
        MapError::MissingTargetField { ref field, owner: "Badge", .. } if field == "code"
    ));

    // Same failure without the plan check, but only once the crawl reaches a badge.
    let mut unchecked = quiet()
        .descend(Descend::ObjectsAndCollections)
        .build_from(&source)
        .unwrap();
    assert!(matches!(
        unchecked.convert().unwrap_err(),
        MapError::MissingTargetField { owner: "Badge", .. }
    ));

    // The default policy never enters collections, so the plan holds.
    assert!(quiet().validate_plan(true).build_from(&source).is_ok());
}

#[test]
fn test_config_overrides_apply() {
    let config = MapperConfig::parse(
        r#"
descend = "objects-and-collections"

[logging]
enabled = false

[[fields]]
type = "Company"
field = "name"
rename = "title"
"#,
    )
    .unwrap();

    let source = staffed();
    source.borrow_mut().staff.clear();
    let target = Mapper::builder()
        .with_config(&config)
        .build_from(&source)
        .unwrap()
        .convert_into::<CompanyWire>()
        .unwrap();
    assert_eq!(target.borrow().title, "Acme");
    assert_eq!(target.borrow().name, "");
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Capture {
    lines: RefCell<Vec<String>>,
    values: RefCell<usize>,
}

impl MapLogger for Capture {
    fn is_log_enabled(&self) -> bool {
        true
    }

    fn is_verbose_enabled(&self) -> bool {
        true
    }

    fn log_impl(&self, msg: &str) {
        self.lines.borrow_mut().push(msg.to_string());
    }

    fn verbose_impl(&self, _msg: &str, _value: &Value) {
        *self.values.borrow_mut() += 1;
    }
}

#[test]
fn test_logger_sees_every_stage() {
    let capture = Capture::default();
    let source = company();
    Mapper::builder()
        .logger(&capture)
        .build_from(&source)
        .unwrap()
        .convert()
        .unwrap();

    let lines = capture.lines.borrow();
    let has = |needle: &str| lines.iter().any(|l| l.contains(needle));
    assert!(has("converting Company into CompanyWire"));
    assert!(has("crawling Emp"));
    assert!(has("cache hit 'xyzId' for Emp.comp_id"));
    assert!(has("caching Company.id under 'xyzId'"));
    assert!(has("set CompanyWire.emp_name"));
    assert!(has("conversion of Designation.company_id skipped"));
    assert!(*capture.values.borrow() > 0);
}
