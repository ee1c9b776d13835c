//! Reverse URL generation for a single route.

use super::core::Route;
use crate::error::RouterError;
use crate::params::{encode, ParamMap};

impl Route {
    /// Substitute `params` into the template and return the URL path
    /// (without a leading slash, like the template itself).
    ///
    /// Static routes return their template and ignore `params`. Required
    /// parameters use the supplied value, falling back to the route default.
    /// An optional group is written out (prefix, encoded value, suffix) only
    /// when the caller supplies its value explicitly; otherwise the whole
    /// group is dropped, even when the parameter has a default. Parameters
    /// the template does not mention are ignored.
    ///
    /// # Errors
    ///
    /// [`RouterError::MissingParameter`] when a required parameter has
    /// neither a supplied value nor a default.
    pub fn generate(&self, params: &ParamMap) -> Result<String, RouterError> {
        if self.is_static() {
            return Ok(self.template().to_string());
        }

        let mut url = self.template().to_string();
        for (name, token) in self.named_params() {
            if let Some(optional) = self.optional_params().get(name) {
                let replacement = match params.get(name) {
                    Some(value) => {
                        format!("{}{}{}", optional.prefix, encode(value), optional.suffix)
                    }
                    None => String::new(),
                };
                url = url.replace(&optional.segment, &replacement);
                continue;
            }

            let value = params
                .get(name)
                .or_else(|| self.default_params().get(name))
                .ok_or_else(|| RouterError::MissingParameter {
                    route: self.name().to_string(),
                    param: name.clone(),
                })?;
            url = url.replace(token.as_str(), &encode(value));
        }

        Ok(url.replace('\\', ""))
    }
}
