pub(crate) mod contract_version_repository;
pub(crate) mod eligible_item_repository;
pub(crate) mod round_repository;
pub(crate) mod task_repository;

pub(crate) use contract_version_repository::ContractVersionRepository;
pub(crate) use eligible_item_repository::EligibleItemRepository;
pub(crate) use round_repository::RoundRepository;
pub(crate) use task_repository::TaskRepository;
