pub mod liquid_staking;
