//! Permission rule service; lists can be narrowed to one role

use shared::models::{Rule, RuleCreate, RuleFilter, RuleUpdate};

use super::{Endpoints, Resource, ResourceService};

#[derive(Debug)]
pub struct Rules;

impl Resource for Rules {
    const NAME: &'static str = "rule";
    const ENDPOINTS: Endpoints = Endpoints::rest("/api/rules");

    type Entity = Rule;
    type Create = RuleCreate;
    type Update = RuleUpdate;
    type Filter = RuleFilter;
}

pub type RuleService = ResourceService<Rules>;
