use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{OracleConfig, CONFIG, LATEST_HEIGHT};

const CONTRACT_NAME: &str = "crates.io:blindbox-blockhash-oracle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let mut recorders = Vec::new();
    for rec in &msg.recorders {
        recorders.push(deps.api.addr_validate(rec)?);
    }

    let config = OracleConfig {
        admin: info.sender.clone(),
        recorders,
    };
    CONFIG.save(deps.storage, &config)?;
    LATEST_HEIGHT.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "blockhash-oracle")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::RecordBlockHash { height, hash_hex } => {
            execute::record_block_hash(deps, env, info, height, hash_hex)
        }
        ExecuteMsg::RecordBlockHashes { entries } => {
            execute::record_block_hashes(deps, env, info, entries)
        }
        ExecuteMsg::UpdateRecorders { add, remove } => {
            execute::update_recorders(deps, env, info, add, remove)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::BlockHash { height } => query::query_block_hash(deps, height),
        QueryMsg::LatestHeight {} => query::query_latest_height(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blindbox_common::StoredBlockHash;
    use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi};

    use crate::msg::BlockHashEntry;
    use crate::state::BLOCK_HASHES;

    fn test_hash(seed: u8) -> String {
        hex::encode([seed; 32])
    }

    fn setup_contract(deps: DepsMut) {
        let mock_api = MockApi::default();
        let admin = mock_api.addr_make("admin");
        let recorder = mock_api.addr_make("recorder");
        let msg = InstantiateMsg {
            recorders: vec![recorder.to_string()],
        };
        let info = message_info(&admin, &[]);
        instantiate(deps, mock_env(), info, msg).unwrap();
    }

    #[test]
    fn test_instantiate() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let admin = deps.api.addr_make("admin");
        let config = CONFIG.load(deps.as_ref().storage).unwrap();
        assert_eq!(config.admin, admin);
        assert_eq!(config.recorders.len(), 1);

        let latest = LATEST_HEIGHT.load(deps.as_ref().storage).unwrap();
        assert_eq!(latest, 0);
    }

    #[test]
    fn test_record_block_hash_unauthorized() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let random_user = deps.api.addr_make("random_user");
        let info = message_info(&random_user, &[]);
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::RecordBlockHash {
                height: 100,
                hash_hex: test_hash(1),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));
    }

    #[test]
    fn test_record_block_hash() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let recorder = deps.api.addr_make("recorder");
        let info = message_info(&recorder, &[]);
        let res = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::RecordBlockHash {
                height: 100,
                hash_hex: test_hash(1),
            },
        )
        .unwrap();
        assert_eq!(res.attributes[0].value, "record_block_hash");
        assert!(res
            .events
            .iter()
            .any(|e| e.ty == "blindbox_block_hash_recorded"));

        let stored = BLOCK_HASHES.load(deps.as_ref().storage, 100).unwrap();
        assert_eq!(stored.height, 100);
        assert_eq!(stored.hash, test_hash(1));
        assert_eq!(stored.recorded_by, recorder);

        let latest = LATEST_HEIGHT.load(deps.as_ref().storage).unwrap();
        assert_eq!(latest, 100);
    }

    #[test]
    fn test_record_block_hash_duplicate() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let recorder = deps.api.addr_make("recorder");
        let info = message_info(&recorder, &[]);
        let msg = ExecuteMsg::RecordBlockHash {
            height: 100,
            hash_hex: test_hash(1),
        };
        execute(deps.as_mut(), mock_env(), info.clone(), msg).unwrap();

        // First write wins; a second write for the same height is rejected
        // even with a different hash.
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::RecordBlockHash {
                height: 100,
                hash_hex: test_hash(2),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractError::HashAlreadyRecorded { height: 100 }
        ));

        let stored = BLOCK_HASHES.load(deps.as_ref().storage, 100).unwrap();
        assert_eq!(stored.hash, test_hash(1));
    }

    #[test]
    fn test_record_block_hash_future_height() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let env = mock_env();
        let recorder = deps.api.addr_make("recorder");
        let info = message_info(&recorder, &[]);
        let err = execute(
            deps.as_mut(),
            env.clone(),
            info,
            ExecuteMsg::RecordBlockHash {
                height: env.block.height,
                hash_hex: test_hash(1),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::HeightNotPast { .. }));
    }

    #[test]
    fn test_record_block_hash_bad_hex() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let recorder = deps.api.addr_make("recorder");
        let info = message_info(&recorder, &[]);
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info.clone(),
            ExecuteMsg::RecordBlockHash {
                height: 100,
                hash_hex: "not-hex".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidHex { .. }));

        // Valid hex but wrong length
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::RecordBlockHash {
                height: 100,
                hash_hex: "abcd".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidHashLength { got: 2 }));
    }

    #[test]
    fn test_record_block_hashes_batch() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let recorder = deps.api.addr_make("recorder");
        let info = message_info(&recorder, &[]);
        let res = execute(
            deps.as_mut(),
            mock_env(),
            info.clone(),
            ExecuteMsg::RecordBlockHashes {
                entries: vec![
                    BlockHashEntry {
                        height: 10,
                        hash_hex: test_hash(1),
                    },
                    BlockHashEntry {
                        height: 11,
                        hash_hex: test_hash(2),
                    },
                ],
            },
        )
        .unwrap();
        assert_eq!(res.events.len(), 2);

        let latest = LATEST_HEIGHT.load(deps.as_ref().storage).unwrap();
        assert_eq!(latest, 11);

        // A batch containing a duplicate is rejected wholesale.
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::RecordBlockHashes {
                entries: vec![
                    BlockHashEntry {
                        height: 12,
                        hash_hex: test_hash(3),
                    },
                    BlockHashEntry {
                        height: 11,
                        hash_hex: test_hash(2),
                    },
                ],
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractError::HashAlreadyRecorded { height: 11 }
        ));
    }

    #[test]
    fn test_query_block_hash() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let recorder = deps.api.addr_make("recorder");
        let info = message_info(&recorder, &[]);
        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::RecordBlockHash {
                height: 100,
                hash_hex: test_hash(1),
            },
        )
        .unwrap();

        let res = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::BlockHash { height: 100 },
        )
        .unwrap();
        let stored: Option<StoredBlockHash> = serde_json::from_slice(&res).unwrap();
        assert_eq!(stored.unwrap().hash, test_hash(1));

        let res = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::BlockHash { height: 999 },
        )
        .unwrap();
        let stored: Option<StoredBlockHash> = serde_json::from_slice(&res).unwrap();
        assert!(stored.is_none());
    }

    #[test]
    fn test_update_recorders() {
        let mut deps = mock_dependencies();
        setup_contract(deps.as_mut());

        let admin = deps.api.addr_make("admin");
        let recorder = deps.api.addr_make("recorder");
        let recorder2 = deps.api.addr_make("recorder2");

        // Non-admin cannot update recorders
        let info = message_info(&recorder, &[]);
        let err = execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::UpdateRecorders {
                add: vec![recorder2.to_string()],
                remove: vec![],
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { .. }));

        let info = message_info(&admin, &[]);
        execute(
            deps.as_mut(),
            mock_env(),
            info,
            ExecuteMsg::UpdateRecorders {
                add: vec![recorder2.to_string()],
                remove: vec![recorder.to_string()],
            },
        )
        .unwrap();

        let config = CONFIG.load(deps.as_ref().storage).unwrap();
        assert_eq!(config.recorders, vec![recorder2]);
    }
}
