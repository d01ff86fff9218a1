use crate::device::Device;
use crate::transport::Transport;
use crate::Error;

macro_rules! register {
    ($($module:ident),+) => {
        paste::paste! {
            $(
                pub mod $module;
            )+

            /// Identifies a preset without carrying its configuration.
            #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
            pub enum Type {
                $(
                    [<$module:camel>],
                )+
            }

            impl std::fmt::Display for Type {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    match self {
                        $(
                            Self::[<$module:camel>] => write!(formatter, stringify!($module)),
                        )+
                    }
                }
            }

            /// A preset together with its configuration, in serializable form.
            #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
            #[serde(tag = "preset", content = "configuration")]
            pub enum Configuration {
                $(
                    #[serde(rename = "" $module)]
                    [<$module:camel>]($module::Configuration),
                )+
            }

            impl Configuration {
                pub fn preset_type(&self) -> Type {
                    match self {
                        $(
                            Configuration::[<$module:camel>](_) => Type::[<$module:camel>],
                        )+
                    }
                }

                pub fn serialize_bincode(&self) -> bincode::Result<Vec<u8>> {
                    match self {
                        $(
                            Configuration::[<$module:camel>](configuration) => {
                                bincode::serialize(configuration)
                            }
                        )+
                    }
                }

                pub fn deserialize_bincode(
                    preset_type: Type,
                    data: &[u8],
                ) -> bincode::Result<Configuration> {
                    match preset_type {
                        $(
                            Type::[<$module:camel>] => Ok(
                                Configuration::[<$module:camel>](bincode::deserialize(data)?)
                            ),
                        )+
                    }
                }

                /// Applies the preset, discarding the module-specific current
                /// report. The sequence short-circuits on the first failing
                /// call; earlier calls are not rolled back.
                pub fn apply<T: Transport>(&self, device: &mut Device<T>) -> Result<(), Error> {
                    match self {
                        $(
                            Configuration::[<$module:camel>](configuration) => {
                                $module::apply(device, configuration).map(|_| ())
                            }
                        )+
                    }
                }
            }
        }
    };
}

register! { c2f, dvs, ndp, nta }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    #[test]
    fn type_names_match_module_names() {
        assert_eq!(Type::C2f.to_string(), "c2f");
        assert_eq!(Type::Dvs.to_string(), "dvs");
        assert_eq!(Type::Ndp.to_string(), "ndp");
        assert_eq!(Type::Nta.to_string(), "nta");
    }

    #[test]
    fn configurations_survive_bincode() {
        let configuration = Configuration::Ndp(ndp::Configuration::default());
        let data = configuration.serialize_bincode().unwrap();
        let deserialized =
            Configuration::deserialize_bincode(configuration.preset_type(), &data).unwrap();
        match deserialized {
            Configuration::Ndp(deserialized) => {
                assert_eq!(deserialized, ndp::Configuration::default())
            }
            _ => panic!("preset type changed across serialization"),
        }
    }

    #[test]
    fn tagged_apply_matches_the_module_entry_point() {
        let mut tagged = Device::new(MockTransport::new());
        Configuration::C2f(c2f::Configuration::default())
            .apply(&mut tagged)
            .unwrap();
        let mut direct = Device::new(MockTransport::new());
        c2f::apply(&mut direct, &c2f::Configuration::default()).unwrap();
        assert_eq!(
            tagged.transport_mut().commands,
            direct.transport_mut().commands
        );
    }
}
