mod common;

use std::time::Duration;

use common::{chain, lcd, FixtureTransport, LCD_ENDPOINT};
use validator_lcd_monitor::config::QueryToggles;
use validator_lcd_monitor::types::Balance;
use validator_lcd_monitor::{ChainConfig, Error, Lcd, Query};

const VALIDATOR: &str = include_str!("fixtures/validator.json");
const NOT_FOUND: &str = include_str!("fixtures/not_found.json");
const DELEGATIONS: &str = include_str!("fixtures/delegations.json");
const DELEGATION: &str = include_str!("fixtures/delegation.json");
const VALIDATORS: &str = include_str!("fixtures/validators.json");
const COMMISSION: &str = include_str!("fixtures/commission.json");
const REWARDS: &str = include_str!("fixtures/rewards.json");
const BALANCES: &str = include_str!("fixtures/balances.json");
const SIGNING_INFO: &str = include_str!("fixtures/signing_info.json");
const SLASHING_PARAMS: &str = include_str!("fixtures/slashing_params.json");
const STAKING_PARAMS: &str = include_str!("fixtures/staking_params.json");
const NULL_FIELDS_VALIDATOR: &str = include_str!("fixtures/null_fields_validator.json");
const NULL_PAGINATION_BALANCES: &str = include_str!("fixtures/null_pagination_balances.json");

fn balance(amount: f64, denom: &str) -> Balance {
    Balance {
        amount,
        denom: denom.to_string(),
    }
}

#[test]
fn disabled_queries_return_nothing_and_skip_the_network() {
    let transport = FixtureTransport::new(VALIDATOR);
    let toggles = Query::ALL
        .into_iter()
        .fold(QueryToggles::default(), |toggles, query| toggles.with(query, false));
    let lcd = Lcd::with_transport(chain(toggles), &transport, Duration::from_secs(5));

    assert!(lcd.get_validator("val").unwrap().is_none());
    assert!(lcd.get_delegations_count("val").unwrap().is_none());
    assert!(lcd.get_unbonds_count("val").unwrap().is_none());
    assert!(lcd.get_single_delegation("val", "wallet").unwrap().is_none());
    assert!(lcd.get_all_validators().unwrap().is_none());
    assert!(lcd.get_validator_commission("val").unwrap().is_none());
    assert!(lcd.get_delegator_rewards("val", "wallet").unwrap().is_none());
    assert!(lcd.get_wallet_balance("wallet").unwrap().is_none());
    assert!(lcd.get_signing_info("valcons").unwrap().is_none());
    assert!(lcd.get_slashing_params().unwrap().is_none());
    assert!(lcd.get_staking_params().unwrap().is_none());

    assert!(transport.requests().is_empty());
}

#[test]
fn disabling_one_query_leaves_the_others() {
    let transport = FixtureTransport::new(VALIDATOR);
    let toggles = QueryToggles::default().with(Query::Validators, false);
    let lcd = Lcd::with_transport(chain(toggles), &transport, Duration::from_secs(5));

    assert!(lcd.get_all_validators().unwrap().is_none());
    assert!(lcd.get_validator("val").unwrap().is_some());
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn validator_is_mapped_from_response() {
    let transport = FixtureTransport::new(VALIDATOR);
    let fetched = lcd(&transport)
        .get_validator("cosmosvaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc56kct20")
        .unwrap()
        .unwrap();

    let validator = &fetched.value.validator;
    assert_eq!(fetched.value.code, 0);
    assert_eq!(
        validator.operator_address,
        "cosmosvaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc56kct20"
    );
    assert_eq!(validator.consensus_pubkey.type_url, "/cosmos.crypto.ed25519.PubKey");
    assert!(!validator.jailed);
    assert_eq!(validator.status, "BOND_STATUS_BONDED");
    assert_eq!(validator.tokens, "1523456789012");
    assert_eq!(validator.description.moniker, "Example Validator");
    assert_eq!(validator.commission.commission_rates.rate, "0.050000000000000000");
    assert_eq!(validator.min_self_delegation, "1");

    assert_eq!(
        fetched.info.url,
        format!(
            "{LCD_ENDPOINT}/cosmos/staking/v1beta1/validators/cosmosvaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc56kct20"
        )
    );
    assert_eq!(fetched.info.chain, "cosmos");
    assert!(fetched.info.success);
}

#[test]
fn nonzero_code_is_an_error_with_info() {
    let transport = FixtureTransport::new(NOT_FOUND);
    let lcd = lcd(&transport);

    let errors = [
        lcd.get_validator("missing").map(|_| ()).unwrap_err(),
        lcd.get_delegations_count("missing").map(|_| ()).unwrap_err(),
        lcd.get_unbonds_count("missing").map(|_| ()).unwrap_err(),
        lcd.get_single_delegation("missing", "wallet").map(|_| ()).unwrap_err(),
        lcd.get_signing_info("missing").map(|_| ()).unwrap_err(),
    ];

    for err in errors {
        assert!(matches!(err.source, Error::UnexpectedCode { code: 5 }));
        assert!(err.to_string().contains("expected code 0, but got 5"));
        assert!(err.info.url.starts_with(LCD_ENDPOINT));
    }
    assert_eq!(transport.requests().len(), 5);
}

#[test]
fn unchecked_endpoints_ignore_embedded_code() {
    let transport = FixtureTransport::new(NOT_FOUND);
    let lcd = lcd(&transport);

    let validators = lcd.get_all_validators().unwrap().unwrap();
    assert!(validators.value.validators.is_empty());

    assert!(lcd.get_validator_commission("val").unwrap().unwrap().value.is_empty());
    assert!(lcd.get_delegator_rewards("val", "wallet").unwrap().unwrap().value.is_empty());
    assert!(lcd.get_wallet_balance("wallet").unwrap().unwrap().value.is_empty());
    assert!(lcd.get_slashing_params().unwrap().is_some());
    assert!(lcd.get_staking_params().unwrap().is_some());
}

#[test]
fn delegation_and_unbond_counts_use_count_total() {
    let transport = FixtureTransport::new(DELEGATIONS);
    let lcd = lcd(&transport);

    let delegations = lcd.get_delegations_count("val1xyz").unwrap().unwrap();
    assert_eq!(delegations.value.pagination.total, "4821");

    let unbonds = lcd.get_unbonds_count("val1xyz").unwrap().unwrap();
    assert_eq!(unbonds.value.pagination.total, "4821");

    assert_eq!(
        transport.requests(),
        vec![
            format!("{LCD_ENDPOINT}/cosmos/staking/v1beta1/validators/val1xyz/delegations?pagination.count_total=true&pagination.limit=1"),
            format!("{LCD_ENDPOINT}/cosmos/staking/v1beta1/validators/val1xyz/unbonding_delegations?pagination.count_total=true&pagination.limit=1"),
        ]
    );
}

#[test]
fn single_delegation_url_and_balance() {
    let transport = FixtureTransport::new(DELEGATION);
    let fetched = lcd(&transport)
        .get_single_delegation("val1xyz", "wallet1abc")
        .unwrap()
        .unwrap();

    assert_eq!(fetched.value, balance(250000000.0, "uatom"));
    assert_eq!(
        transport.requests(),
        vec![format!(
            "{LCD_ENDPOINT}/cosmos/staking/v1beta1/validators/val1xyz/delegations/wallet1abc"
        )]
    );
}

#[test]
fn all_validators_are_returned_unmodified() {
    let transport = FixtureTransport::new(VALIDATORS);
    let fetched = lcd(&transport).get_all_validators().unwrap().unwrap();

    let expected: serde_json::Value = serde_json::from_str(VALIDATORS).unwrap();
    let returned = serde_json::to_value(&fetched.value.validators).unwrap();
    assert_eq!(returned, expected["validators"]);

    let validators = &fetched.value.validators;
    assert_eq!(validators.len(), 2);
    assert_eq!(validators[0].operator_address, "cosmosvaloper1first");
    assert_eq!(validators[1].operator_address, "cosmosvaloper1second");
    assert!(validators[1].jailed);

    assert_eq!(
        transport.requests(),
        vec![format!(
            "{LCD_ENDPOINT}/cosmos/staking/v1beta1/validators?pagination.count_total=true&pagination.limit=1000"
        )]
    );
}

#[test]
fn commission_is_flattened_into_balances() {
    let transport = FixtureTransport::new(COMMISSION);
    let fetched = lcd(&transport).get_validator_commission("val1xyz").unwrap().unwrap();

    assert_eq!(
        fetched.value,
        vec![
            balance(123.456, "uatom"),
            balance(
                0.5,
                "ibc/0025F8A87464A471E66B234C4F93AEC5B4DA3D42D7986451A059273426290DD5"
            ),
        ]
    );
    assert_eq!(
        transport.requests(),
        vec![format!("{LCD_ENDPOINT}/cosmos/distribution/v1beta1/validators/val1xyz/commission")]
    );
}

#[test]
fn rewards_put_wallet_before_validator_in_path() {
    let transport = FixtureTransport::new(REWARDS);
    let fetched = lcd(&transport)
        .get_delegator_rewards("val1xyz", "wallet1abc")
        .unwrap()
        .unwrap();

    assert_eq!(fetched.value, vec![balance(98765.4321, "uatom")]);
    assert_eq!(
        transport.requests(),
        vec![format!(
            "{LCD_ENDPOINT}/cosmos/distribution/v1beta1/delegators/wallet1abc/rewards/val1xyz"
        )]
    );
}

#[test]
fn wallet_balance_keeps_order() {
    let transport = FixtureTransport::new(BALANCES);
    let fetched = lcd(&transport).get_wallet_balance("wallet1abc").unwrap().unwrap();

    assert_eq!(
        fetched.value,
        vec![balance(5000000.0, "uatom"), balance(42.0, "uosmo")]
    );
    assert_eq!(
        transport.requests(),
        vec![format!("{LCD_ENDPOINT}/cosmos/bank/v1beta1/balances/wallet1abc")]
    );
}

#[test]
fn signing_info_is_mapped_from_response() {
    let transport = FixtureTransport::new(SIGNING_INFO);
    let fetched = lcd(&transport)
        .get_signing_info("cosmosvalcons1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5w9thxw")
        .unwrap()
        .unwrap();

    let info = &fetched.value.val_signing_info;
    assert_eq!(info.start_height, "5200791");
    assert_eq!(info.index_offset, "12345678");
    assert_eq!(info.missed_blocks_counter, "7");
    assert!(!info.tombstoned);
    assert_eq!(
        transport.requests(),
        vec![format!(
            "{LCD_ENDPOINT}/cosmos/slashing/v1beta1/signing_infos/cosmosvalcons1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5w9thxw"
        )]
    );
}

#[test]
fn slashing_and_staking_params() {
    let slashing_transport = FixtureTransport::new(SLASHING_PARAMS);
    let slashing = lcd(&slashing_transport).get_slashing_params().unwrap().unwrap();
    assert_eq!(slashing.value.params.signed_blocks_window, "10000");
    assert_eq!(slashing.value.params.downtime_jail_duration, "600s");
    assert_eq!(
        slashing_transport.requests(),
        vec![format!("{LCD_ENDPOINT}/cosmos/slashing/v1beta1/params")]
    );

    let staking_transport = FixtureTransport::new(STAKING_PARAMS);
    let staking = lcd(&staking_transport).get_staking_params().unwrap().unwrap();
    assert_eq!(staking.value.params.max_validators, 180);
    assert_eq!(staking.value.params.bond_denom, "uatom");
    assert_eq!(staking.value.params.unbonding_time, "1814400s");
    assert_eq!(
        staking_transport.requests(),
        vec![format!("{LCD_ENDPOINT}/cosmos/staking/v1beta1/params")]
    );
}

#[test]
fn decode_failure_propagates_with_info() {
    let transport = FixtureTransport::new("upstream connect error");
    let err = lcd(&transport).get_validator("val1xyz").unwrap_err();

    assert!(matches!(err.source, Error::Decode(_)));
    assert!(!err.info.success);
    assert_eq!(
        err.info.url,
        format!("{LCD_ENDPOINT}/cosmos/staking/v1beta1/validators/val1xyz")
    );
}

#[test]
fn bad_amount_is_an_error_with_info() {
    let transport = FixtureTransport::new(r#"{"balances":[{"denom":"uatom","amount":"lots"}]}"#);
    let err = lcd(&transport).get_wallet_balance("wallet1abc").unwrap_err();

    assert!(matches!(err.source, Error::InvalidAmount { .. }));
    assert!(err.info.success);
}

#[test]
fn transport_failure_propagates_with_info() {
    let lcd = Lcd::new(
        ChainConfig::new("local", "http://127.0.0.1:1"),
        Duration::from_secs(2),
    )
    .unwrap();
    assert_eq!(lcd.timeout(), Duration::from_secs(2));

    let err = lcd.get_staking_params().unwrap_err();

    assert!(matches!(err.source, Error::Transport(_)));
    assert_eq!(err.info.chain, "local");
    assert_eq!(err.info.url, "http://127.0.0.1:1/cosmos/staking/v1beta1/params");
    assert!(!err.info.success);
}


#[test]
fn null_pagination_reads_as_default() {
    let transport = FixtureTransport::new(NULL_PAGINATION_BALANCES);
    let fetched = lcd(&transport).get_wallet_balance("wallet1abc").unwrap().unwrap();

    assert_eq!(fetched.value, vec![balance(5.0, "uatom")]);
}

#[test]
fn null_fields_in_validator_read_as_default() {
    let transport = FixtureTransport::new(NULL_FIELDS_VALIDATOR);
    let fetched = lcd(&transport).get_validator("val1xyz").unwrap().unwrap();

    let validator = &fetched.value.validator;
    assert_eq!(fetched.value.code, 0);
    assert_eq!(fetched.value.message, "");
    assert_eq!(validator.operator_address, "val1xyz");
    assert_eq!(validator.tokens, "900");
    assert_eq!(validator.description.moniker, "");
    assert_eq!(validator.unbonding_time, "");
}
