use dioxus::prelude::*;
use dioxus_router::use_navigator;
use matelog_core::model::{ActivityContext, Age, Choice, Gender, Group, Specialty};

use crate::context::{AppContext, use_session_handle};
use crate::routes::Route;
use crate::tracking::use_screen_tracking;
use crate::views::common::FieldError;
use crate::vm::{
    AuthErrors, AuthField, AuthForm, AuthMode, AuthRequest, REGISTERED_NOTICE,
    errors_from_failure,
};

#[component]
pub fn AuthView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session_handle();
    let navigator = use_navigator();

    let mut mode = use_signal(AuthMode::default);
    let mut form = use_signal(AuthForm::default);
    let mut errors = use_signal(AuthErrors::default);
    let mut success = use_signal(|| None::<&'static str>);
    let mut loading = use_signal(|| false);

    {
        let ctx = ctx.clone();
        use_future(move || {
            let session = ctx.session();
            async move { session.prepare_auth().await }
        });
    }

    let _tracking = use_screen_tracking(mode().screen(), ActivityContext::none());

    use_effect(move || {
        if session.user().is_some() {
            navigator.replace(Route::Lessons {});
        }
    });

    let mut switch_mode = move |next: AuthMode| {
        mode.set(next);
        errors.set(AuthErrors::default());
        success.set(None);
    };

    let submit = move |_| {
        if loading() {
            return;
        }
        let current = mode();
        let request = match form.read().validate(current) {
            Ok(request) => request,
            Err(found) => {
                errors.set(found);
                return;
            }
        };
        errors.set(AuthErrors::default());
        success.set(None);
        loading.set(true);

        let auth = ctx.session();
        spawn(async move {
            match request {
                AuthRequest::Login(credentials) => match auth.login(&credentials).await {
                    Ok(user) => {
                        session.signed_in(user);
                        navigator.push(Route::Lessons {});
                    }
                    Err(failure) => errors.set(errors_from_failure(&failure, current)),
                },
                AuthRequest::Register(registration) => {
                    match auth.register(&registration).await {
                        Ok(_) => {
                            mode.set(AuthMode::Login);
                            form.with_mut(|form| {
                                form.password.clear();
                                form.password_confirm.clear();
                            });
                            success.set(Some(REGISTERED_NOTICE));
                        }
                        Err(failure) => errors.set(errors_from_failure(&failure, current)),
                    }
                }
            }
            loading.set(false);
        });
    };

    let current = mode();
    let general_error = errors.read().general().map(str::to_string);
    let field_error = move |field: AuthField| errors.read().field(field).map(str::to_string);

    rsx! {
        div { class: "auth-container",
            div { class: "auth-box",
                div { class: "auth-header",
                    h1 { "MateLog" }
                    p { "Plataforma de Aprendizaje de Matemáticas" }
                }

                div { class: "auth-tabs",
                    button {
                        class: if current == AuthMode::Login { "tab active" } else { "tab" },
                        r#type: "button",
                        onclick: move |_| switch_mode(AuthMode::Login),
                        "Iniciar Sesión"
                    }
                    button {
                        class: if current == AuthMode::Register { "tab active" } else { "tab" },
                        r#type: "button",
                        onclick: move |_| switch_mode(AuthMode::Register),
                        "Registrarse"
                    }
                }

                if let Some(message) = success() {
                    div { class: "success-message", "{message}" }
                }
                if let Some(message) = general_error {
                    div { class: "error-message", "{message}" }
                }

                div { class: "auth-form",
                    div { class: "form-group",
                        label { r#for: "username", "Usuario" }
                        input {
                            id: "username",
                            r#type: "text",
                            placeholder: "Ingresa tu usuario",
                            value: "{form.read().username}",
                            oninput: move |evt| {
                                form.write().username = evt.value();
                                errors.write().clear_field(AuthField::Username);
                            },
                        }
                        FieldError { message: field_error(AuthField::Username) }
                    }

                    div { class: "form-group",
                        label { r#for: "password", "Contraseña" }
                        input {
                            id: "password",
                            r#type: "password",
                            placeholder: if current == AuthMode::Register { "Mínimo 6 caracteres" } else { "Ingresa tu contraseña" },
                            value: "{form.read().password}",
                            oninput: move |evt| {
                                form.write().password = evt.value();
                                errors.write().clear_field(AuthField::Password);
                            },
                        }
                        FieldError { message: field_error(AuthField::Password) }
                    }

                    if current == AuthMode::Register {
                        div { class: "form-group",
                            label { r#for: "password_confirm", "Confirmar Contraseña" }
                            input {
                                id: "password_confirm",
                                r#type: "password",
                                placeholder: "Repite tu contraseña",
                                value: "{form.read().password_confirm}",
                                oninput: move |evt| {
                                    form.write().password_confirm = evt.value();
                                    errors.write().clear_field(AuthField::PasswordConfirm);
                                },
                            }
                            FieldError { message: field_error(AuthField::PasswordConfirm) }
                        }

                        div { class: "form-row",
                            div { class: "form-group",
                                label { "Grupo" }
                                {choice_select::<Group>(form.read().group, move |value| {
                                    form.write().group = value;
                                    errors.write().clear_field(AuthField::Group);
                                })}
                                FieldError { message: field_error(AuthField::Group) }
                            }
                            div { class: "form-group",
                                label { "Especialidad" }
                                {choice_select::<Specialty>(form.read().specialty, move |value| {
                                    form.write().specialty = value;
                                    errors.write().clear_field(AuthField::Specialty);
                                })}
                                FieldError { message: field_error(AuthField::Specialty) }
                            }
                        }

                        div { class: "form-row",
                            div { class: "form-group",
                                label { "Género" }
                                {choice_select::<Gender>(form.read().gender, move |value| {
                                    form.write().gender = value;
                                    errors.write().clear_field(AuthField::Gender);
                                })}
                                FieldError { message: field_error(AuthField::Gender) }
                            }
                            div { class: "form-group",
                                label { "Edad" }
                                {choice_select::<Age>(form.read().age, move |value| {
                                    form.write().age = value;
                                    errors.write().clear_field(AuthField::Age);
                                })}
                                FieldError { message: field_error(AuthField::Age) }
                            }
                        }
                    }

                    button {
                        class: "btn btn-primary auth-submit",
                        r#type: "button",
                        disabled: loading(),
                        onclick: submit,
                        if loading() { "Procesando..." } else { "{current.submit_label()}" }
                    }
                }
            }
        }
    }
}

fn choice_select<T: Choice>(
    selected: Option<T>,
    mut on_pick: impl FnMut(Option<T>) + 'static,
) -> Element {
    let value = selected.map_or("", Choice::code);
    rsx! {
        select {
            value: "{value}",
            onchange: move |evt| on_pick(T::from_code(&evt.value())),
            option { value: "", "Selecciona..." }
            for item in T::ALL.iter().copied() {
                option {
                    value: item.code(),
                    selected: selected.map(Choice::code) == Some(item.code()),
                    "{item.label()}"
                }
            }
        }
    }
}
