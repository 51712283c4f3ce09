//! Savings Plans pricing parameters.
//!
//! Every parameter is published by AWS under a human-readable label
//! (`"Asia Pacific (Tokyo)"`, `"Partial Upfront"`, ...). Those labels are what
//! the pricing endpoint expects as path segments and what CLI users see, so each
//! enum here carries its label, parses from it, and serializes to it.

use crate::utils::error::CurError;

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
        pub enum $name {
            $(
                #[cfg_attr(feature = "cli", value(alias = $label))]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// AWS 使用的顯示名稱
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CurError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .copied()
                    .ok_or_else(|| CurError::InvalidConfigValueError {
                        field: stringify!($name).to_string(),
                        value: s.to_string(),
                        reason: format!("Unknown {}", stringify!($name)),
                    })
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

labeled_enum! {
    /// Savings Plans 契約期間
    Term {
        OneYear => "1 year",
        ThreeYear => "3 year",
    }
}

labeled_enum! {
    /// Savings Plans 付款選項
    PaymentOption {
        AllUpfront => "All Upfront",
        PartialUpfront => "Partial Upfront",
        NoUpfront => "No Upfront",
    }
}

labeled_enum! {
    /// AWS location names as they appear in the pricing data.
    Region {
        UsEastNVirginia => "US East (N. Virginia)",
        UsWestOregon => "US West (Oregon)",
        EuIreland => "EU (Ireland)",
        AsiaPacificTokyo => "Asia Pacific (Tokyo)",
        EuFrankfurt => "EU (Frankfurt)",
        UsEastOhio => "US East (Ohio)",
        AsiaPacificSydney => "Asia Pacific (Sydney)",
        AsiaPacificSingapore => "Asia Pacific (Singapore)",
        AwsGovcloudUs => "AWS GovCloud (US)",
        AsiaPacificMumbai => "Asia Pacific (Mumbai)",
        CanadaCentral => "Canada (Central)",
        AsiaPacificSeoul => "Asia Pacific (Seoul)",
        UsWestNCalifornia => "US West (N. California)",
        EuLondon => "EU (London)",
        SouthAmericaSaoPaulo => "South America (Sao Paulo)",
        EuStockholm => "EU (Stockholm)",
        EuParis => "EU (Paris)",
        AwsGovcloudUsEast => "AWS GovCloud (US-East)",
        EuSpain => "EU (Spain)",
        EuMilan => "EU (Milan)",
        AsiaPacificOsaka => "Asia Pacific (Osaka)",
        AfricaCapeTown => "Africa (Cape Town)",
        AsiaPacificHyderabad => "Asia Pacific (Hyderabad)",
        AsiaPacificHongKong => "Asia Pacific (Hong Kong)",
        AsiaPacificJakarta => "Asia Pacific (Jakarta)",
        EuZurich => "EU (Zurich)",
        IsraelTelAviv => "Israel (Tel Aviv)",
        AsiaPacificMalaysia => "Asia Pacific (Malaysia)",
        MiddleEastBahrain => "Middle East (Bahrain)",
        MiddleEastUae => "Middle East (UAE)",
        AsiaPacificThailand => "Asia Pacific (Thailand)",
        MexicoCentral => "Mexico (Central)",
        AsiaPacificMelbourne => "Asia Pacific (Melbourne)",
        CanadaWestCalgary => "Canada West (Calgary)",
        UsEastDallas => "US East (Dallas)",
        UsWestLosAngeles => "US West (Los Angeles)",
        UsEastNewYorkCity => "US East (New York City)",
        UsEastAtlanta => "US East (Atlanta)",
        UsEastChicago => "US East (Chicago)",
        UsWestPhoenix => "US West (Phoenix)",
        UsEastMiami => "US East (Miami)",
        UsEastHouston => "US East (Houston)",
        UsEastPhiladelphia => "US East (Philadelphia)",
        UsWestDenver => "US West (Denver)",
        ArgentinaBuenosAires => "Argentina (Buenos Aires)",
        UsEastBoston => "US East (Boston)",
        ChileSantiago => "Chile (Santiago)",
        PeruLima => "Peru (Lima)",
        AustraliaPerth => "Australia (Perth)",
        MexicoQueretaro => "Mexico (Queretaro)",
        UsWestHonolulu => "US West (Honolulu)",
        NigeriaLagos => "Nigeria (Lagos)",
        PhilippinesManila => "Philippines (Manila)",
        PolandWarsaw => "Poland (Warsaw)",
        TaiwanTaipei => "Taiwan (Taipei)",
        ThailandBangkok => "Thailand (Bangkok)",
        IndiaKolkata => "India (Kolkata)",
        UsEastKansasCity2 => "US East (Kansas City 2)",
        NewZealandAuckland => "New Zealand (Auckland)",
        UsEastVerizonCharlotte => "US East (Verizon) - Charlotte",
        UsEastVerizonNashville => "US East (Verizon) - Nashville",
        UsEastVerizonWashingtonDc => "US East (Verizon) - Washington DC",
        DenmarkCopenhagen => "Denmark (Copenhagen)",
        FinlandHelsinki => "Finland (Helsinki)",
        GermanyHamburg => "Germany (Hamburg)",
        IndiaDelhi => "India (Delhi)",
        OmanMuscat => "Oman (Muscat)",
        UsEastMinneapolis => "US East (Minneapolis)",
        UsWestLasVegas => "US West (Las Vegas)",
        UsWestPortland => "US West (Portland)",
        UsWestSeattle => "US West (Seattle)",
        MoroccoCasablanca => "Morocco (Casablanca)",
        AsiaPacificSktSeoul => "Asia Pacific (SKT) - Seoul",
        CanadaBellToronto => "Canada (BELL) - Toronto",
        EuBritishTelecomManchester => "EU (British Telecom) - Manchester",
        EuVodafoneBerlin => "EU (Vodafone) - Berlin",
        EuVodafoneDortmund => "EU (Vodafone) - Dortmund",
        EuVodafoneLondon => "EU (Vodafone) - London",
        EuVodafoneManchester => "EU (Vodafone) - Manchester",
        EuVodafoneMunich => "EU (Vodafone) - Munich",
        UsEastVerizonChicago => "US East (Verizon) - Chicago",
        UsEastVerizonDetroit => "US East (Verizon) - Detroit",
        UsEastVerizonHouston => "US East (Verizon) - Houston",
        UsEastVerizonMiami => "US East (Verizon) - Miami",
        UsEastVerizonMinneapolis => "US East (Verizon) - Minneapolis",
        UsEastVerizonTampa => "US East (Verizon) - Tampa",
        UsWestVerizonLosAngeles => "US West (Verizon) - Los Angeles",
        UsWestVerizonPhoenix => "US West (Verizon) - Phoenix",
        UsWestVerizonSanFranciscoBayArea => "US West (Verizon) - San Francisco Bay Area",
        AsiaPacificKddiOsaka => "Asia Pacific (KDDI) - Osaka",
        AsiaPacificKddiTokyo => "Asia Pacific (KDDI) - Tokyo",
        AsiaPacificSktDaejeon => "Asia Pacific (SKT) - Daejeon",
        UsEastVerizonAtlanta => "US East (Verizon) - Atlanta",
        UsEastVerizonBoston => "US East (Verizon) - Boston",
        UsEastVerizonDallas => "US East (Verizon) - Dallas",
        UsEastVerizonNewYork => "US East (Verizon) - New York",
        UsWestVerizonDenver => "US West (Verizon) - Denver",
        UsWestVerizonLasVegas => "US West (Verizon) - Las Vegas",
        UsWestVerizonSeattle => "US West (Verizon) - Seattle",
    }
}

labeled_enum! {
    /// EC2 作業系統
    OperatingSystem {
        Linux => "Linux",
        Rhel => "RHEL",
        Suse => "SUSE",
        RhelHa => "Red Hat Enterprise Linux with HA",
        Windows => "Windows",
        UbuntuPro => "Ubuntu Pro",
        WindowsSqlWeb => "Windows with SQL Web",
        LinuxSqlWeb => "Linux with SQL Web",
        LinuxSqlStd => "Linux with SQL Std",
        WindowsSqlStd => "Windows with SQL Std",
        Byol => "BYOL",
        LinuxSqlEnt => "Linux with SQL Ent",
        WindowsSqlEnt => "Windows with SQL Ent",
        RhelSqlStd => "RHEL with SQL Std",
        RhelHaSqlStd => "Red Hat Enterprise Linux with HA with SQL Std",
        RhelSqlEnt => "RHEL with SQL Ent",
        RhelHaSqlEnt => "Red Hat Enterprise Linux with HA with SQL Ent",
        RhelSqlWeb => "RHEL with SQL Web",
    }
}

labeled_enum! {
    /// EC2 租用方式
    Tenancy {
        Shared => "Shared",
        Dedicated => "Dedicated",
        Host => "Host",
    }
}

labeled_enum! {
    /// Fargate 作業系統
    FargateOperatingSystem {
        Linux => "Linux",
        Windows => "Windows",
    }
}

labeled_enum! {
    /// Fargate CPU 架構
    CpuArchitecture {
        X86 => "X86",
        Arm => "ARM",
    }
}

/// Compute Savings Plans products with a published metered unit map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SavingsPlanProduct {
    Ec2,
    Fargate,
    Lambda,
}

impl SavingsPlanProduct {
    /// 定價 API 上的目錄名稱
    pub fn path_segment(&self) -> &'static str {
        match self {
            SavingsPlanProduct::Ec2 => "compute-savings-plan-ec2",
            SavingsPlanProduct::Fargate => "compute-savings-plan-fargate-with-arm",
            SavingsPlanProduct::Lambda => "compute-savings-plan-lambda",
        }
    }

    /// Field holding the on-demand price of an entry.
    pub fn on_demand_field(&self) -> &'static str {
        match self {
            SavingsPlanProduct::Ec2 => "ec2:PricePerUnit",
            SavingsPlanProduct::Fargate => "fargate:PricePerUnit",
            SavingsPlanProduct::Lambda => "lambda:PricePerUnit",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SavingsPlanProduct::Ec2 => "EC2",
            SavingsPlanProduct::Fargate => "Fargate",
            SavingsPlanProduct::Lambda => "Lambda",
        }
    }
}

/// A parameter combination that identifies one metered unit map.
pub trait RateTableQuery: Send + Sync {
    fn product(&self) -> SavingsPlanProduct;
    fn region(&self) -> Region;
    /// Path segments after the product directory, in URL order, without `index.json`.
    fn path_segments(&self) -> Vec<&'static str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for region in Region::ALL {
            assert_eq!(region.label().parse::<Region>().unwrap(), *region);
        }
        assert_eq!("partial upfront".parse::<PaymentOption>().unwrap(), PaymentOption::PartialUpfront);
        assert!("Mars (Olympus Mons)".parse::<Region>().is_err());
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&Region::AsiaPacificTokyo).unwrap();
        assert_eq!(json, "\"Asia Pacific (Tokyo)\"");

        let term: Term = serde_json::from_str("\"3 year\"").unwrap();
        assert_eq!(term, Term::ThreeYear);
    }

    #[test]
    fn test_product_fields() {
        assert_eq!(SavingsPlanProduct::Fargate.on_demand_field(), "fargate:PricePerUnit");
        assert_eq!(SavingsPlanProduct::Lambda.path_segment(), "compute-savings-plan-lambda");
    }
}
