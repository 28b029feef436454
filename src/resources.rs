//! Resource facades: Account, Collection, Group and Text.
//!
//! Each facade is generated from a table of `operation => "rpc.method"`
//! rows. The same table provides the typed methods
//! (`client.group().add_text(..)`) and the name-based
//! [`Collection::invoke`]-style lookup used by the CLI. A row may add
//! `key = "..."` to narrow the trimmed result to one field of `result`.
//!
//! Params are passed through untouched; the service validates them.

use serde_json::Value;

use crate::client::SaploClient;
use crate::error::{Result, SaploError};
use crate::rpc::TrimPolicy;

/// One row of a facade's dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Rust-side name, e.g. `list_texts`.
    pub name: &'static str,
    /// JSON-RPC method, e.g. `group.listTexts`.
    pub method: &'static str,
    /// Field of `result` returned when trimming.
    pub trim_key: Option<&'static str>,
}

impl Operation {
    /// Trim policy for this operation with trimming switched on or off.
    pub fn trim_policy(&self, trim: bool) -> TrimPolicy {
        TrimPolicy {
            enabled: trim,
            result_key: self.trim_key.map(str::to_owned),
        }
    }
}

fn dispatch(client: &SaploClient, op: &Operation, trim: bool, params: Value) -> Result<Value> {
    client.call(op.method, params, &op.trim_policy(trim))
}

macro_rules! facade {
    (@key) => { None };
    (@key $key:literal) => { Some($key) };

    (
        $(#[$meta:meta])*
        $facade:ident, $resource:literal, $table:ident {
            $( $op:ident => $method:literal $(, key = $key:literal)? ; )*
        }
    ) => {
        #[doc = concat!("Dispatch table for the `", $resource, "` facade.")]
        pub const $table: &[Operation] = &[
            $( Operation {
                name: stringify!($op),
                method: $method,
                trim_key: facade!(@key $($key)?),
            }, )*
        ];

        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $facade<'a> {
            client: &'a SaploClient,
            trim: bool,
        }

        impl<'a> $facade<'a> {
            pub const RESOURCE: &'static str = $resource;

            pub(crate) fn new(client: &'a SaploClient) -> Self {
                Self { client, trim: true }
            }

            /// Switch trimming on (default) or off for calls made through
            /// this handle. Errors are never trimmed.
            pub fn trim(self, trim: bool) -> Self {
                Self { trim, ..self }
            }

            pub fn operations() -> &'static [Operation] {
                $table
            }

            /// Call an operation by its table name.
            ///
            /// # Errors
            ///
            /// `SaploError::UnknownOperation` if `name` is not in the table,
            /// otherwise whatever [`SaploClient::call`] returns.
            pub fn invoke(&self, name: &str, params: Value) -> Result<Value> {
                let op = $table
                    .iter()
                    .find(|op| op.name == name)
                    .ok_or_else(|| SaploError::UnknownOperation {
                        resource: $resource,
                        operation: name.to_string(),
                    })?;
                dispatch(self.client, op, self.trim, params)
            }

            $(
                #[doc = concat!("Calls `", $method, "`.")]
                pub fn $op(&self, params: Value) -> Result<Value> {
                    const OP: Operation = Operation {
                        name: stringify!($op),
                        method: $method,
                        trim_key: facade!(@key $($key)?),
                    };
                    dispatch(self.client, &OP, self.trim, params)
                }
            )*
        }
    };
}

facade! {
    /// Account information for the authenticated key.
    Account, "account", ACCOUNT_OPERATIONS {
        get => "account.get";
    }
}

facade! {
    /// Collections hold the texts a key has uploaded.
    Collection, "collection", COLLECTION_OPERATIONS {
        create => "collection.create";
        get => "collection.get";
        update => "collection.update";
        delete => "collection.delete";
        list => "collection.list";
        reset => "collection.reset";
    }
}

facade! {
    /// Groups of texts, with relatedness queries.
    Group, "group", GROUP_OPERATIONS {
        create => "group.create";
        get => "group.get";
        update => "group.update";
        delete => "group.delete";
        list => "group.list";
        list_texts => "group.listTexts";
        add_text => "group.addText";
        delete_text => "group.deleteText";
        related_groups => "group.relatedGroups";
        related_texts => "group.relatedTexts";
    }
}

facade! {
    /// Individual texts: tagging and relatedness.
    Text, "text", TEXT_OPERATIONS {
        create => "text.create";
        get => "text.get";
        update => "text.update";
        delete => "text.delete";
        tags => "text.tags";
        related_texts => "text.relatedTexts";
        related_groups => "text.relatedGroups";
    }
}

/// Look up a facade's table by resource name (`"collection"`, ...).
pub fn operations_for(resource: &str) -> Option<&'static [Operation]> {
    match resource {
        "account" => Some(ACCOUNT_OPERATIONS),
        "collection" => Some(COLLECTION_OPERATIONS),
        "group" => Some(GROUP_OPERATIONS),
        "text" => Some(TEXT_OPERATIONS),
        _ => None,
    }
}

/// Call `resource.operation` by name, as the CLI does.
pub fn invoke(
    client: &SaploClient,
    resource: &str,
    operation: &str,
    params: Value,
    trim: bool,
) -> Result<Value> {
    match resource {
        "account" => client.account().trim(trim).invoke(operation, params),
        "collection" => client.collection().trim(trim).invoke(operation, params),
        "group" => client.group().trim(trim).invoke(operation, params),
        "text" => client.text().trim(trim).invoke(operation, params),
        _ => Err(SaploError::UnknownOperation {
            resource: "client",
            operation: format!("{}.{}", resource, operation),
        }),
    }
}
