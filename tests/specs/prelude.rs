//! Shared fixture: a small banking module registered against the engine

use serde_json::{json, Value};
use std::error::Error;
use std::sync::Arc;
use teller_adapters::MemoryStore;
use teller_core::classify::{Classifier, FaultHandler};
use teller_core::localize::StaticCatalog;
use teller_core::registry::RegistryBuilder;
use teller_core::status::{Fault, Information, Warning};
use teller_core::{builtin, ResultCode, ServiceError};
use teller_engine::{
    Call, Dispatcher, EngineConfig, MethodBinding, ParamSpec, RawArgs, ServiceRegistry,
};

/// Codes minted from the billing block (index 1)
#[derive(Debug, Clone, Copy)]
pub struct BillingCodes {
    /// INF-101
    pub deposit_recorded: ResultCode,
    /// WAR-10101
    pub low_balance: ResultCode,
    /// ERR-20701
    pub insufficient_funds: ResultCode,
    /// ERR-20702
    pub account_frozen: ResultCode,
}

pub fn billing_codes() -> BillingCodes {
    let mut registry = RegistryBuilder::new();
    let block = registry.register(1, "billing").unwrap();
    BillingCodes {
        deposit_recorded: block.info(0).unwrap(),
        low_balance: block.warn(0).unwrap(),
        insufficient_funds: block.err(0).unwrap(),
        account_frozen: block.err(1).unwrap(),
    }
}

/// Raised by the compliance collaborator; the classifier handler below
/// maps it onto the frozen-account code
#[derive(Debug)]
pub struct FrozenError;

impl std::fmt::Display for FrozenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "account frozen by compliance hold")
    }
}

impl Error for FrozenError {}

pub struct FrozenHandler {
    code: ResultCode,
}

impl FaultHandler for FrozenHandler {
    fn handles(&self, raw: &(dyn Error + 'static)) -> bool {
        raw.downcast_ref::<FrozenError>().is_some()
    }

    fn to_fault(&self, raw: &(dyn Error + 'static)) -> Option<Fault> {
        raw.downcast_ref::<FrozenError>()?;
        Fault::new(self.code).ok()
    }
}

pub struct TestEngine {
    pub dispatcher: Dispatcher,
    pub store: MemoryStore,
    pub codes: BillingCodes,
}

pub fn engine() -> TestEngine {
    engine_with(EngineConfig::default())
}

pub fn engine_with(config: EngineConfig) -> TestEngine {
    let codes = billing_codes();
    let store = MemoryStore::new();
    store.seed("account", "alice", json!({ "balance": 100 }));
    store.seed("account", "bob", json!({ "balance": 50 }));

    let catalog = StaticCatalog::new()
        .with_message("INF-101", "deposit recorded for {0}: {1}")
        .with_message("WAR-10101", "balance low on {0}")
        .with_message("ERR-20701", "insufficient funds: account {0} has {1}")
        .with_message("ERR-20702", "account is frozen");

    let dispatcher = Dispatcher::builder(Arc::new(store.clone()))
        .services(banking_services(codes))
        .classifier(Classifier::new().with_handler(Box::new(FrozenHandler {
            code: codes.account_frozen,
        })))
        .localizer(Arc::new(catalog))
        .config(config)
        .build();

    TestEngine {
        dispatcher,
        store,
        codes,
    }
}

pub fn args(pairs: &[(&str, Value)]) -> RawArgs {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

pub fn call(service: &str, method: &str, pairs: &[(&str, Value)]) -> Call {
    Call::new(service, method, args(pairs))
}

fn balance_of(data: &Value) -> i64 {
    data["balance"].as_i64().unwrap_or(0)
}

fn banking_services(codes: BillingCodes) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();

    registry
        .register(
            "account",
            "balance",
            MethodBinding::new(vec![ParamSpec::entity("account", "account")], |_ctx, args| {
                let account = args.entity("account")?;
                Ok(json!({ "balance": account.data["balance"] }))
            }),
        )
        .unwrap();

    registry
        .register(
            "account",
            "deposit",
            MethodBinding::new(
                vec![
                    ParamSpec::entity("account", "account"),
                    ParamSpec::required("amount"),
                ],
                move |ctx, args| {
                    let amount = args.i64("amount")?;
                    let mut account = args.entity("account")?.clone();
                    let balance = balance_of(&account.data) + amount;
                    account.data["balance"] = json!(balance);
                    ctx.session()?.save(&account)?;
                    ctx.push_info(
                        Information::new(codes.deposit_recorded)?
                            .with_param(account.key())
                            .with_param(amount),
                    );
                    if balance < 25 {
                        ctx.push_warning(
                            Warning::new(codes.low_balance)?.with_param(account.key()),
                        );
                    }
                    Ok(json!({ "balance": balance }))
                },
            ),
        )
        .unwrap();

    registry
        .register(
            "account",
            "transfer",
            MethodBinding::new(
                vec![
                    ParamSpec::entity("from", "account"),
                    ParamSpec::entity("to", "account"),
                    ParamSpec::required("amount"),
                ],
                move |ctx, args| {
                    let amount = args.i64("amount")?;
                    let mut from = args.entity("from")?.clone();
                    let mut to = args.entity("to")?.clone();
                    let available = balance_of(&from.data);
                    if available < amount {
                        return Err(ServiceError::new(codes.insufficient_funds)
                            .with_param(from.key())
                            .with_param(available)
                            .into());
                    }
                    from.data["balance"] = json!(available - amount);
                    to.data["balance"] = json!(balance_of(&to.data) + amount);
                    let session = ctx.session()?;
                    session.save(&from)?;
                    session.save(&to)?;
                    Ok(json!({
                        "from": from.data["balance"],
                        "to": to.data["balance"]
                    }))
                },
            ),
        )
        .unwrap();

    // writes an audit record in a nested scope before checking funds:
    // the record survives even when the withdrawal itself faults
    registry
        .register(
            "account",
            "withdraw_logged",
            MethodBinding::new(
                vec![
                    ParamSpec::entity("account", "account"),
                    ParamSpec::required("amount"),
                ],
                move |ctx, args| {
                    let amount = args.i64("amount")?;
                    let mut account = args.entity("account")?.clone();
                    let audit_key = format!("{}-{}", account.key(), amount);
                    let audit = json!({ "account": account.key(), "amount": amount });
                    ctx.nested(&[], |ctx, _| {
                        ctx.session()?.insert("audit", &audit_key, audit.clone())?;
                        Ok(())
                    })?;

                    let balance = balance_of(&account.data);
                    if balance < amount {
                        return Err(ServiceError::new(codes.insufficient_funds)
                            .with_param(account.key())
                            .with_param(balance)
                            .into());
                    }
                    account.data["balance"] = json!(balance - amount);
                    ctx.session()?.save(&account)?;
                    Ok(json!({ "balance": balance - amount }))
                },
            ),
        )
        .unwrap();

    // carries the account into a nested scope and reports both bindings
    registry
        .register(
            "account",
            "reprice",
            MethodBinding::new(vec![ParamSpec::entity("account", "account")], |ctx, args| {
                let account = args.entity("account")?.clone();
                let outer_scope = account.scope().0;
                let inner = ctx.nested(&[&account], |_ctx, carried| {
                    let Some(inside) = carried.into_iter().next() else {
                        return Err("carried entity missing".into());
                    };
                    Ok(json!({
                        "scope": inside.scope().0,
                        "kind": inside.kind(),
                        "key": inside.key(),
                    }))
                })?;
                Ok(json!({ "outer_scope": outer_scope, "inner": inner }))
            }),
        )
        .unwrap();

    // like reprice, but carries the same account twice: used to trip
    // the carried-object limit
    registry
        .register(
            "account",
            "reprice_pair",
            MethodBinding::new(vec![ParamSpec::entity("account", "account")], |ctx, args| {
                let account = args.entity("account")?.clone();
                ctx.nested(&[&account, &account], |_ctx, carried| {
                    Ok(json!(carried.len()))
                })
            }),
        )
        .unwrap();

    // hands the outer-scope instance to the nested session directly,
    // which the store rejects
    registry
        .register(
            "account",
            "smuggle",
            MethodBinding::new(vec![ParamSpec::entity("account", "account")], |ctx, args| {
                let account = args.entity("account")?.clone();
                ctx.nested(&[], |ctx, _| {
                    ctx.session()?.save(&account)?;
                    Ok(())
                })?;
                Ok(json!("smuggled"))
            }),
        )
        .unwrap();

    registry
        .register(
            "account",
            "close",
            MethodBinding::new(
                vec![ParamSpec::entity("account", "account")],
                move |_ctx, args| {
                    let account = args.entity("account")?;
                    Err(ServiceError::new(codes.account_frozen)
                        .with_extra(json!({ "account": account.key(), "retry_after": 86400 }))
                        .into())
                },
            ),
        )
        .unwrap();

    // writes, then raises something no handler knows
    registry
        .register(
            "account",
            "record_then_fail",
            MethodBinding::new(
                vec![ParamSpec::entity("account", "account")],
                |ctx, args| {
                    let mut account = args.entity("account")?.clone();
                    account.data["balance"] = json!(0);
                    ctx.session()?.save(&account)?;
                    Err("ledger subsystem exploded".into())
                },
            ),
        )
        .unwrap();

    registry
        .register(
            "account",
            "freeze_poke",
            MethodBinding::new(vec![], |_ctx, _args| Err(Box::new(FrozenError))),
        )
        .unwrap();

    registry
        .register(
            "account",
            "echo",
            MethodBinding::new(vec![ParamSpec::required("a")], |_ctx, args| {
                Ok(json!({ "used": 1, "a": args.get("a") }))
            }),
        )
        .unwrap();
    registry
        .register(
            "account",
            "echo",
            MethodBinding::new(
                vec![ParamSpec::required("a"), ParamSpec::required("b")],
                |_ctx, args| Ok(json!({ "used": 2, "a": args.get("a"), "b": args.get("b") })),
            ),
        )
        .unwrap();

    registry
        .register(
            "system",
            "ping",
            MethodBinding::new(vec![], |_ctx, _args| Ok(json!("pong"))).without_transaction(),
        )
        .unwrap();

    // transaction-disabled, but opens an explicit scope for its write
    registry
        .register(
            "system",
            "note",
            MethodBinding::new(
                vec![ParamSpec::required("key"), ParamSpec::required("text")],
                |ctx, args| {
                    let key = args.str("key")?.to_string();
                    let text = args.str("text")?.to_string();
                    ctx.nested(&[], |ctx, _| {
                        ctx.session()?.insert("note", &key, json!({ "text": text }))?;
                        Ok(())
                    })?;
                    Ok(json!("noted"))
                },
            )
            .without_transaction(),
        )
        .unwrap();

    registry
        .register(
            "system",
            "admin",
            MethodBinding::new(vec![], |_ctx, _args| {
                Err(builtin::forbidden("admin console").into())
            }),
        )
        .unwrap();

    registry
        .register(
            "system",
            "login",
            MethodBinding::new(vec![], |_ctx, _args| {
                Err(builtin::authentication_required().into())
            }),
        )
        .unwrap();

    // the card number must never reach the logs
    registry
        .register(
            "payment",
            "charge",
            MethodBinding::new(
                vec![
                    ParamSpec::entity("account", "account"),
                    ParamSpec::required("amount"),
                    ParamSpec::required("card_number").sensitive(),
                ],
                |_ctx, args| Ok(json!({ "charged": args.i64("amount")? })),
            ),
        )
        .unwrap();

    registry
}
