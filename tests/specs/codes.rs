//! Result-code space: blocks, ranges, and the registry

use similar_asserts::assert_eq;
use teller_core::registry::{RegistryBuilder, RegistryError};
use teller_core::{CodeError, ResultCode, Severity};

#[test]
fn block_ranges_are_deterministic() {
    let mut builder = RegistryBuilder::new();
    let billing = builder.register(1, "billing").unwrap();

    assert_eq!(billing.info(0).unwrap().value(), 101);
    assert_eq!(billing.warn(0).unwrap().value(), 10_101);
    assert_eq!(billing.err(0).unwrap().value(), 20_701);
}

#[test]
fn builtin_block_owns_the_first_ranges() {
    let registry = RegistryBuilder::new().build();
    let builtin = registry.builtin();
    assert_eq!(builtin.info_range(), (1, 100));
    assert_eq!(builtin.warning_range(), (10_001, 10_100));
    assert_eq!(builtin.error_range(), (20_001, 20_700));
    assert_eq!(builtin.err(0).unwrap().value(), 20_001);
}

#[test]
fn duplicate_block_index_fails_at_startup() {
    let mut builder = RegistryBuilder::new();
    builder.register(1, "billing").unwrap();
    assert_eq!(
        builder.register(1, "shipping").unwrap_err(),
        RegistryError::DuplicateBlockIndex {
            index: 1,
            existing: "billing".to_string()
        }
    );
}

#[test]
fn registered_blocks_never_overlap() {
    let mut builder = RegistryBuilder::new();
    let blocks: Vec<_> = (1..=10)
        .map(|i| builder.register(i, format!("module-{}", i)).unwrap())
        .collect();
    let registry = builder.build();

    let mut all = vec![registry.builtin().clone()];
    all.extend(blocks);
    for a in &all {
        for b in &all {
            if a.index() == b.index() {
                continue;
            }
            assert!(a.error_range().1 < b.error_range().0 || b.error_range().1 < a.error_range().0);
            assert!(a.info_range().1 < b.info_range().0 || b.info_range().1 < a.info_range().0);
            assert!(
                a.warning_range().1 < b.warning_range().0
                    || b.warning_range().1 < a.warning_range().0
            );
        }
    }
}

#[test]
fn offsets_past_tier_capacity_fail() {
    let mut builder = RegistryBuilder::new();
    let block = builder.register(1, "billing").unwrap();
    assert!(matches!(
        block.info(100),
        Err(CodeError::OffsetOutOfRange { capacity: 100, .. })
    ));
    assert!(matches!(
        block.warn(100),
        Err(CodeError::OffsetOutOfRange { capacity: 100, .. })
    ));
    assert!(matches!(
        block.err(700),
        Err(CodeError::OffsetOutOfRange { capacity: 700, .. })
    ));
}

#[test]
fn severity_round_trips_and_rejects_mismatches() {
    for (severity, value) in [
        (Severity::Success, 0),
        (Severity::Info, 5_000),
        (Severity::Warning, 15_000),
        (Severity::Error, 42_000),
        (Severity::Fatal, 99_999),
    ] {
        let code = ResultCode::new(severity, value).unwrap();
        assert_eq!(code.severity(), severity);
        assert_eq!(ResultCode::from_value(value).unwrap().severity(), severity);
    }

    assert!(matches!(
        ResultCode::new(Severity::Warning, 42_000),
        Err(CodeError::SeverityMismatch { .. })
    ));
}
