//! Invocation boundary: operation name plus string arguments in, JSON
//! bytes out. Argument counts are checked here so the operations behind
//! the boundary can assume their inputs are present.

use serde::Serialize;

use crate::error::Error;
use crate::ledger::Ledger;
use crate::service::ContractService;
use crate::status::{Category, Role};

/// Chart family selector understood by `getContractsByUserFiltered`.
const COUNT_STATUS_CHART: &str = "CountStatus";

/// Dispatch one invocation against the service. Unknown category or chart
/// labels yield empty result sets; unknown operation names and malformed
/// payloads are errors.
pub fn invoke<L: Ledger>(
    service: &ContractService<L>,
    operation: &str,
    args: &[String],
) -> Result<Vec<u8>, Error> {
    match operation {
        "initializeUser" => {
            require_args(operation, args, 1)?;
            service.register_user(&args[0])?;
            Ok(Vec::new())
        }
        "saveContractDetails" => {
            require_args(operation, args, 1)?;
            let draft = serde_json::from_str(&args[0])?;
            let contract = service.create_contract(draft)?;
            to_json(&contract)
        }
        "getContractById" => {
            require_args(operation, args, 1)?;
            to_json(&service.contract_by_id(&args[0])?)
        }
        "applyTransition" => {
            require_args(operation, args, 2)?;
            let receipt = service.apply_transition(&args[0], &args[1])?;
            to_json(&receipt.contract)
        }
        "getContractsByUser" => {
            require_args(operation, args, 1)?;
            to_json(&service.contracts_by_user(&args[0])?)
        }
        "getContractsByUserFiltered" => {
            require_args(operation, args, 3)?;
            let category = (args[1] == COUNT_STATUS_CHART)
                .then(|| Category::from_label(&args[2]))
                .flatten();
            match category {
                Some(category) => {
                    to_json(&service.contracts_by_user_in_category(&args[0], category)?)
                }
                // An unrecognized chart or category selects nothing.
                None => to_json::<[u8; 0]>(&[]),
            }
        }
        "getCategoryCounts" => {
            require_args(operation, args, 1)?;
            to_json(&service.category_counts(&args[0])?)
        }
        "getDashboard" => {
            require_args(operation, args, 2)?;
            to_json(&service.dashboard(&args[0], parse_role(&args[1])?)?)
        }
        "getNotifications" => {
            require_args(operation, args, 2)?;
            to_json(&service.notifications(&args[0], parse_role(&args[1])?)?)
        }
        "getNotificationCounts" => {
            require_args(operation, args, 2)?;
            to_json(&service.notification_counts(&args[0], parse_role(&args[1])?)?)
        }
        "saveAttachment" => {
            require_args(operation, args, 3)?;
            service.attach_document(&args[0], &args[1], args[2].clone().into_bytes())?;
            Ok(Vec::new())
        }
        "getAttachment" => {
            require_args(operation, args, 2)?;
            service.attachment(&args[0], &args[1])
        }
        _ => Err(Error::UnknownOperation(operation.to_string())),
    }
}

fn require_args(operation: &str, args: &[String], expected: usize) -> Result<(), Error> {
    if args.len() != expected {
        return Err(Error::InvalidArgumentCount {
            operation: operation.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    Ok(serde_json::to_vec(value)?)
}

fn parse_role(label: &str) -> Result<Role, Error> {
    Role::from_label(label).ok_or_else(|| Error::Malformed(format!("unknown role `{label}`")))
}
